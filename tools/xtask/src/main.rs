//! # xtask - 开发辅助工具
//!
//! 提供本地质量门禁与开发辅助命令。
//!
//! ## 命令
//!
//! - `check-all`: 运行 fmt、clippy、test
//! - `cov-actions`: 运行 nom-actions 覆盖率
//! - `curves`: 打印时间曲线采样表，或单条曲线的字符图

use std::process::{Command, ExitCode};

use clap::{Parser, Subcommand};
use nom_actions::TimingCurve;
use tracing::{debug, info, warn};

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "开发辅助工具")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// 输出调试日志
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// 运行 fmt、clippy、test 门禁检查
    CheckAll,
    /// 运行 nom-actions 覆盖率报告
    CovActions,
    /// 打印时间曲线采样
    Curves {
        /// 只打印这一条曲线（如 quad_ease_out），并画出字符图
        curve: Option<String>,

        /// 采样点数量
        #[arg(short, long, default_value = "11")]
        samples: usize,
    },
}

fn run(step: &str, cmd: &mut Command) -> anyhow::Result<()> {
    eprintln!("\n==> {step}");
    let status = cmd.status()?;
    if !status.success() {
        anyhow::bail!("{step} failed with {status}");
    }
    Ok(())
}

fn ensure_cargo_llvm_cov_available() -> anyhow::Result<()> {
    let mut cmd = Command::new("cargo");
    cmd.args(["llvm-cov", "--version"]);
    match cmd.status() {
        Ok(s) if s.success() => Ok(()),
        _ => anyhow::bail!(
            "cargo llvm-cov 不可用。\n\
请先安装：\n\
  - cargo install cargo-llvm-cov\n\
  - rustup component add llvm-tools-preview\n\
然后重试。"
        ),
    }
}

fn main() -> ExitCode {
    if let Err(e) = real_main() {
        eprintln!("xtask error: {e:#}");
        return ExitCode::from(1);
    }
    ExitCode::from(0)
}

fn real_main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::CheckAll => {
            let mut fmt = Command::new("cargo");
            fmt.args(["fmt", "--all", "--", "--check"]);
            run("cargo fmt --all -- --check", &mut fmt)?;

            let mut clippy = Command::new("cargo");
            clippy.args(["clippy", "--workspace", "--all-targets"]);
            run("cargo clippy --workspace --all-targets", &mut clippy)?;

            let mut test = Command::new("cargo");
            test.args(["test", "--workspace"]);
            run("cargo test --workspace", &mut test)?;
        }
        Commands::CovActions => {
            ensure_cargo_llvm_cov_available()?;

            let mut cov = Command::new("cargo");
            cov.args(["llvm-cov", "-p", "nom-actions", "--all-features", "--html"]);
            run(
                "cargo llvm-cov -p nom-actions --all-features --html",
                &mut cov,
            )?;

            eprintln!("\nCoverage HTML: target/llvm-cov/html/index.html");
        }
        Commands::Curves { curve, samples } => {
            curves(curve.as_deref(), samples)?;
        }
    }

    Ok(())
}

/// 安装日志输出（库本身不安装 subscriber）
fn init_logging(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}

//=============================================================================
// curves 命令实现
//=============================================================================

/// 字符图的行数
const PLOT_ROWS: usize = 16;

/// 打印曲线采样
fn curves(name: Option<&str>, samples: usize) -> anyhow::Result<()> {
    if samples < 2 {
        anyhow::bail!("采样点数量至少为 2: {samples}");
    }

    match name {
        Some(name) => {
            let curve: TimingCurve = name.parse()?;
            info!(curve = %curve, samples = samples, "打印单条曲线");
            print_header(samples);
            print_row(curve, samples);
            println!();
            print_plot(curve, samples);
        }
        None => {
            info!(curves = TimingCurve::all().count(), samples = samples, "打印全部曲线");
            print_header(samples);
            for curve in TimingCurve::all() {
                print_row(curve, samples);
            }
        }
    }

    Ok(())
}

/// 在 [0, 1] 上均匀采样，返回 (p, value)
fn sample(curve: TimingCurve, samples: usize) -> impl Iterator<Item = (f32, f32)> {
    let last = (samples - 1) as f32;
    (0..samples).map(move |i| {
        let p = i as f32 / last;
        (p, curve.value(p, 0.0, 1.0, 1.0))
    })
}

fn print_header(samples: usize) {
    let last = (samples - 1) as f32;
    let columns: Vec<String> = (0..samples)
        .map(|i| format!("{:>7.2}", i as f32 / last))
        .collect();
    println!("{:<24}{}", "curve", columns.join(""));
}

fn print_row(curve: TimingCurve, samples: usize) {
    let values: Vec<String> = sample(curve, samples)
        .map(|(_, v)| format!("{v:>7.3}"))
        .collect();
    println!("{:<24}{}", curve.to_string(), values.join(""));

    // 端点必须精确
    let end = curve.value(1.0, 0.0, 1.0, 1.0);
    if end != 1.0 {
        warn!(curve = %curve, end = end, "曲线终点不是 1");
    }
}

fn print_plot(curve: TimingCurve, samples: usize) {
    let points: Vec<(f32, f32)> = sample(curve, samples).collect();
    let (min, max) = points
        .iter()
        .fold((0.0f32, 1.0f32), |(lo, hi), (_, v)| (lo.min(*v), hi.max(*v)));
    debug!(min = min, max = max, "字符图范围");

    let span = max - min;
    for row in (0..PLOT_ROWS).rev() {
        let level = min + span * row as f32 / (PLOT_ROWS - 1) as f32;
        let line: String = points
            .iter()
            .map(|(_, v)| {
                let cell = ((v - min) / span * (PLOT_ROWS - 1) as f32).round() as usize;
                if cell == row { '*' } else { ' ' }
            })
            .collect();
        println!("{level:>7.2} |{line}");
    }
    println!("{:>7} +{}", "", "-".repeat(points.len()));
}
