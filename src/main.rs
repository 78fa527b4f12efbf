// ==========================================
// 金属生产可持续性评估 (EcoLCA Pro) - 命令行入口
// ==========================================
// 子命令:
//   assess <file>   按九个步骤录入 JSON 答案并提交
//   demo            模板快捷提交
//   dashboard       显示最近一次结果
//   export          导出报告 (json / csv)
//   compare [file]  传统 / 循环路径对比
//   health          预测服务健康检查
//   options         列出可选项目录
//   config          查看 / 修改 config_kv
// ==========================================

use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};

use eco_lca_pro::api::dashboard_api::{DashboardView, Trend};
use eco_lca_pro::api::report::{self, ExportFormat};
use eco_lca_pro::app::{get_default_db_path, AppOptions, AppState};
use eco_lca_pro::config::config_keys;
use eco_lca_pro::domain::types::{
    EndOfLifeScenario, EnergySource, MetalType, OptionEntry, ProcessRoute, RecoveryRate,
    TransportDistance, TransportMode, WasteStream,
};
use eco_lca_pro::engine::apply_derivations;
use eco_lca_pro::engine::pathway::PathwayComparison;
use eco_lca_pro::i18n::{t, t_with_args};
use eco_lca_pro::{logging, AssessmentInput, AssessmentPatch, SubmitOutcome};

#[derive(Parser)]
#[command(name = "eco-lca-pro", version, about = "Metal production sustainability assessment")]
struct Cli {
    /// SQLite database path
    #[arg(long, global = true)]
    db: Option<String>,

    /// Prediction service base URL (overrides config and environment)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Use local formulas only
    #[arg(long, global = true)]
    offline: bool,

    /// Interface language (en, zh-CN)
    #[arg(long, global = true)]
    locale: Option<String>,

    /// Print machine-readable JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Walk the nine intake steps with answers from a JSON file, then submit
    Assess {
        /// JSON object with camelCase field names
        file: PathBuf,
    },
    /// Load the aluminium recycling template and submit immediately
    Demo,
    /// Show the most recent assessment results
    Dashboard,
    /// Export the most recent assessment results
    Export {
        #[arg(long, default_value = "json")]
        format: ExportFormat,
        /// Output file or directory (default: current directory)
        #[arg(long, default_value = ".")]
        output: PathBuf,
    },
    /// Compare conventional and circular pathways for an input
    Compare {
        /// JSON input file (default: built-in template)
        file: Option<PathBuf>,
    },
    /// Check the prediction service
    Health,
    /// List selectable options for each field
    Options,
    /// Read or write stored configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// List stored values and the resolved configuration
    List,
    /// Store a value
    Set { key: String, value: String },
    /// Remove a stored value
    Unset { key: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    logging::init_with_default("warn");

    let cli = Cli::parse();
    let db_path = cli.db.clone().unwrap_or_else(get_default_db_path);
    let state = AppState::with_options(
        db_path,
        AppOptions {
            api_url: cli.api_url.clone(),
            offline: cli.offline,
            locale: cli.locale.clone(),
        },
    )
    .map_err(|e| anyhow!(e))?;
    state.apply_locale();

    match cli.command {
        Command::Assess { file } => {
            let patch = read_patch(&file)?;
            run_assessment(&state, patch, cli.json).await
        }
        Command::Demo => {
            let outcome = state.assessment_api.apply_template_and_submit().await?;
            print_outcome(&state, outcome, cli.json)
        }
        Command::Dashboard => print_dashboard(&state, cli.json),
        Command::Export { format, output } => {
            let dashboard = state.dashboard_api()?;
            let results = dashboard
                .results()
                .ok_or_else(|| anyhow!(t("dashboard.no_results")))?;
            let path = report::write_report(results, format, &output)?;
            println!("{}", path.display());
            Ok(())
        }
        Command::Compare { file } => {
            let input = match file {
                Some(path) => {
                    let patch = read_patch(&path)?;
                    let mut input = AssessmentInput::form_defaults();
                    input.merge(&patch);
                    apply_derivations(&mut input, &patch);
                    input
                }
                None => AssessmentInput::demo_template(),
            };
            let comparison = state.compare_pathways(&input).await;
            print_comparison(&comparison, cli.json)
        }
        Command::Health => check_health(&state, cli.json).await,
        Command::Options => print_options(cli.json),
        Command::Config { action } => run_config(&state, action),
    }
}

fn read_patch(path: &Path) -> Result<AssessmentPatch> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("无法读取输入文件: {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("输入文件格式错误: {}", path.display()))
}

/// 一次性写入全部答案后逐步前进；任一步骤不通过即停止
async fn run_assessment(state: &AppState, patch: AssessmentPatch, json: bool) -> Result<()> {
    let api = &state.assessment_api;
    api.update(patch)?;

    loop {
        let snapshot = api.next()?;
        if snapshot.current_step.is_last() {
            break;
        }
    }

    let outcome = api.submit().await?;
    print_outcome(state, outcome, json)
}

fn print_outcome(state: &AppState, outcome: SubmitOutcome, json: bool) -> Result<()> {
    match outcome {
        SubmitOutcome::AlreadySubmitting => {
            println!("{}", t("submission.already_submitting"));
            Ok(())
        }
        SubmitOutcome::Submitted(_) => print_dashboard(state, json),
    }
}

fn print_dashboard(state: &AppState, json: bool) -> Result<()> {
    let dashboard = state.dashboard_api()?;
    let Some(view) = dashboard.view() else {
        println!("{}", t("dashboard.no_results"));
        return Ok(());
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&view)?);
        return Ok(());
    }
    render_dashboard(&view);
    Ok(())
}

fn render_dashboard(view: &DashboardView) {
    println!("{}  [{}]", view.assessment_id, view.provenance);
    println!("{}", view.timestamp);
    println!(
        "Material efficiency: {:.1}% ({})   Model confidence: {:.2}   Environmental efficiency: {:.2}",
        view.material_efficiency_pct,
        view.material_efficiency_rating,
        view.model_confidence,
        view.environmental_efficiency
    );
    println!(
        "Transport distance: {:.0} km   Recovery rate: {:.0}%",
        view.transport_distance_km, view.recovery_rate_pct
    );
    println!();

    for card in &view.metrics {
        let arrow = match card.trend {
            Trend::Up => "↑",
            Trend::Down => "↓",
        };
        println!(
            "  {:<20} {:>12.2} {:<12} {} {:?}",
            card.title, card.value, card.unit, arrow, card.color
        );
    }

    if let Some(evaluation) = &view.evaluation {
        println!();
        println!(
            "  Evaluation: overall {:.2}, environmental {:.2}, circularity {:.2}",
            evaluation.overall_score, evaluation.environmental_score, evaluation.circularity_score
        );
        println!("  {}", evaluation.feedback);
    }

    println!();
    println!("Recommendations:");
    for (index, rec) in view.recommendations.iter().enumerate() {
        println!(
            "  {}. [{:?} | {} | {}] {}",
            index + 1,
            rec.priority,
            rec.impact,
            rec.category,
            rec.recommendation
        );
    }

    let conventional = &view.chart.conventional;
    let circular = &view.chart.circular;
    println!();
    println!("{:<12} {:>12} {:>12}", "", "conventional", "circular");
    for (label, a, b) in [
        ("carbon", conventional.carbon, circular.carbon),
        ("energy", conventional.energy, circular.energy),
        ("water", conventional.water, circular.water),
        ("waste", conventional.waste, circular.waste),
        ("resources", conventional.resources, circular.resources),
        ("toxicity", conventional.toxicity, circular.toxicity),
    ] {
        println!("{:<12} {:>12.1} {:>12.1}", label, a, b);
    }
}

fn print_comparison(comparison: &PathwayComparison, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(comparison)?);
        return Ok(());
    }

    let conventional = &comparison.conventional;
    let circular = &comparison.circular;
    println!("{:<22} {:>14} {:>14} {:>10}", "", "conventional", "circular", "change");
    println!(
        "{:<22} {:>14.2} {:>14.2} {:>9.1}%",
        "carbon (tons CO₂)",
        conventional.carbon_footprint,
        circular.carbon_footprint,
        -comparison.carbon_reduction_pct
    );
    println!(
        "{:<22} {:>14.2} {:>14.2} {:>9.1}%",
        "energy (MJ)",
        conventional.energy_consumption,
        circular.energy_consumption,
        -comparison.energy_reduction_pct
    );
    println!(
        "{:<22} {:>14.2} {:>14.2} {:>9.1}%",
        "water (m³)",
        conventional.water_usage,
        circular.water_usage,
        -comparison.water_reduction_pct
    );
    println!(
        "{:<22} {:>14.2} {:>14.2} {:>+9.1}pt",
        "circularity",
        conventional.circularity_index,
        circular.circularity_index,
        comparison.circularity_improvement_pts
    );
    Ok(())
}

async fn check_health(state: &AppState, json: bool) -> Result<()> {
    let Some(client) = &state.lca_client else {
        bail!("{}", t_with_args("remote.unreachable", &[("error", "remote estimation disabled")]));
    };

    match client.check_health().await {
        Ok(health) => {
            if json {
                println!(
                    "{}",
                    serde_json::json!({
                        "success": health.success,
                        "message": health.message,
                        "models_loaded": health.models_loaded,
                        "ml_ready": health.ml_ready,
                    })
                );
            } else {
                println!(
                    "{}",
                    t_with_args("remote.healthy", &[("url", client.settings().base_url.as_str())])
                );
                if let Some(message) = health.message {
                    println!("{}", message);
                }
            }
            Ok(())
        }
        Err(e) => {
            let error = e.to_string();
            bail!("{}", t_with_args("remote.unreachable", &[("error", error.as_str())]))
        }
    }
}

fn print_options(json: bool) -> Result<()> {
    let catalogs: Vec<(&str, Vec<OptionEntry>)> = vec![
        ("metalType", MetalType::catalog()),
        ("processRoute", ProcessRoute::catalog()),
        ("energySource", EnergySource::catalog()),
        ("transportMode", TransportMode::catalog()),
        ("transportDistance", TransportDistance::catalog()),
        ("endOfLifeScenario", EndOfLifeScenario::catalog()),
        ("recoveryRate", RecoveryRate::catalog()),
        ("wasteStreams", WasteStream::catalog()),
    ];

    if json {
        let map: serde_json::Map<String, serde_json::Value> = catalogs
            .into_iter()
            .map(|(field, entries)| {
                serde_json::to_value(entries).map(|value| (field.to_string(), value))
            })
            .collect::<Result<_, serde_json::Error>>()?;
        println!("{}", serde_json::to_string_pretty(&map)?);
        return Ok(());
    }

    for (field, entries) in catalogs {
        println!("{}:", field);
        for entry in entries {
            println!("  {:<18} {}", entry.value, entry.label);
        }
    }
    Ok(())
}

fn run_config(state: &AppState, action: ConfigAction) -> Result<()> {
    let manager = &state.config_manager;
    match action {
        ConfigAction::List => {
            for (key, value) in manager.get_config_snapshot()? {
                let shown = if key == config_keys::API_AUTH_TOKEN {
                    "********".to_string()
                } else {
                    value
                };
                println!("{} = {}", key, shown);
            }
            println!("---");
            println!("{}", serde_json::to_string_pretty(&state.config)?);
        }
        ConfigAction::Set { key, value } => {
            if !config_keys::ALL.contains(&key.as_str()) {
                bail!("未知配置键: {} (可选: {})", key, config_keys::ALL.join(", "));
            }
            manager.set_global_config_value(&key, &value)?;
            println!("{}", t("common.success"));
        }
        ConfigAction::Unset { key } => {
            if manager.remove_global_config_value(&key)? {
                println!("{}", t("common.success"));
            } else {
                println!("{}", t("common.failed"));
            }
        }
    }
    Ok(())
}
