use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use history_exam::export::ExportFormat;
use history_exam::models::{load_exam_config, save_exam_config, DifficultyRatio};
use history_exam::{logger, AiModel, App, Config, ExamConfig, GenerateOptions, View};

#[derive(Parser)]
#[command(name = "history-exam")]
#[command(version, about = "Tạo đề kiểm tra Lịch Sử 9 bằng Gemini", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// 生成试卷并导出
    Generate(GenerateArgs),
    /// 列出可选模型
    Models,
    /// 检查试卷参数能否提交
    Validate {
        #[arg(short, long, default_value = "exam.toml")]
        config: PathBuf,
    },
    /// 写出一份默认的试卷参数文件
    Init {
        #[arg(default_value = "exam.toml")]
        path: PathBuf,
        /// 覆盖已存在的文件
        #[arg(long)]
        force: bool,
    },
}

#[derive(clap::Args)]
struct GenerateArgs {
    /// 试卷参数文件（TOML），缺省时使用默认参数
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// 模型 id，例如 gemini-2.5-flash
    #[arg(short, long)]
    model: Option<String>,
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    topic: Option<String>,
    /// 选择题数量
    #[arg(long)]
    mcq: Option<u32>,
    /// 自由作答题数量
    #[arg(long)]
    essay: Option<u32>,
    /// 总分（正数）
    #[arg(long, value_parser = parse_total_score)]
    score: Option<f64>,
    /// 难度比例，格式：识记,理解,运用,高阶运用（例如 40,30,20,10）
    #[arg(long)]
    ratio: Option<String>,
    /// 终端预览视图：matrix / exam / answers
    #[arg(long, default_value = "exam")]
    view: View,
    /// 不在终端打印预览
    #[arg(long)]
    quiet: bool,
    /// 导出格式，可重复：docx / html / pdf
    #[arg(short, long = "format")]
    formats: Vec<ExportFormat>,
    /// 导出目录（覆盖 OUTPUT_DIR）
    #[arg(short, long)]
    out: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // 加载配置
    let mut config = Config::from_env()?;

    // 初始化日志
    logger::init(config.verbose_logging);

    match cli.command {
        Command::Generate(args) => {
            if let Some(out) = &args.out {
                config.output_dir = out.clone();
            }
            let exam = build_exam_config(&args).await?;
            let options = GenerateOptions {
                view: (!args.quiet).then_some(args.view),
                formats: if args.formats.is_empty() {
                    vec![ExportFormat::Docx]
                } else {
                    args.formats.clone()
                },
            };

            let app = App::initialize(config).await?;
            app.run(exam, &options).await?;
        }
        Command::Models => {
            for model in AiModel::all() {
                let marker = if model.is_default() { "*" } else { " " };
                println!(
                    "{} {:<24} {:<22} {}",
                    marker,
                    model.id(),
                    model.display_name(),
                    model.description()
                );
            }
        }
        Command::Validate { config: path } => {
            let exam = load_exam_config(&path).await?;
            exam.validate()
                .with_context(|| format!("{} không thể tạo đề", path.display()))?;
            info!(
                "✓ {} 可以提交 (难度比例合计 {}%)",
                path.display(),
                exam.difficulty_ratio.total()
            );
        }
        Command::Init { path, force } => {
            if path.exists() && !force {
                bail!("{} 已存在，使用 --force 覆盖", path.display());
            }
            save_exam_config(&ExamConfig::default(), &path).await?;
            info!("✓ 已写出默认试卷参数: {}", path.display());
        }
    }

    Ok(())
}

/// 配置文件 + 命令行参数 → 试卷参数
async fn build_exam_config(args: &GenerateArgs) -> Result<ExamConfig> {
    let mut exam = match &args.config {
        Some(path) => load_exam_config(path).await?,
        None => ExamConfig::default(),
    };

    if let Some(id) = &args.model {
        exam.selected_model = id.parse()?;
    }
    if let Some(name) = &args.name {
        exam.name = name.clone();
    }
    if let Some(topic) = &args.topic {
        exam.topic = topic.clone();
    }
    if let Some(mcq) = args.mcq {
        exam.mcq_count = mcq;
    }
    if let Some(essay) = args.essay {
        exam.essay_count = essay;
    }
    if let Some(score) = args.score {
        exam.total_score = score;
    }
    if let Some(ratio) = &args.ratio {
        exam.difficulty_ratio = parse_ratio(ratio)?;
    }

    Ok(exam)
}

fn parse_total_score(text: &str) -> std::result::Result<f64, String> {
    let score: f64 = text
        .trim()
        .parse()
        .map_err(|_| format!("总分不是数字: {}", text))?;
    if score.is_finite() && score > 0.0 {
        Ok(score)
    } else {
        Err(format!("总分必须大于 0: {}", text))
    }
}

fn parse_ratio(text: &str) -> Result<DifficultyRatio> {
    let parts = text
        .split(',')
        .map(|p| p.trim().parse::<u32>())
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("难度比例格式错误: {}", text))?;
    match parts.as_slice() {
        [k, c, a, h] => Ok(DifficultyRatio::new(*k, *c, *a, *h)),
        _ => bail!("难度比例需要 4 个数值: {}", text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_total_score() {
        assert_eq!(parse_total_score("10").unwrap(), 10.0);
        assert_eq!(parse_total_score(" 7.5 ").unwrap(), 7.5);
        for bad in ["0", "-1", "NaN", "inf", "mười"] {
            assert!(parse_total_score(bad).is_err(), "{} 应该被拒绝", bad);
        }
    }

    #[test]
    fn test_parse_ratio() {
        assert_eq!(
            parse_ratio("40, 30, 20, 10").unwrap(),
            DifficultyRatio::new(40, 30, 20, 10)
        );
        assert!(parse_ratio("40,30,20").is_err());
        assert!(parse_ratio("40,30,x,10").is_err());
    }

    #[test]
    fn test_cli_rejects_zero_score() {
        assert!(Cli::try_parse_from(["history-exam", "generate", "--score", "0"]).is_err());
        assert!(Cli::try_parse_from(["history-exam", "generate", "--score", "8"]).is_ok());
    }
}
