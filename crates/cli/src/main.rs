use anyhow::Context;
use chrono::{DateTime, FixedOffset};
use clap::{Parser, Subcommand};
use nrank_core::gateway::{KeywordInsights, ProviderGateway};
use nrank_core::llm::gemini::GeminiConfig;
use nrank_core::view::trending::TrendingState;
use nrank_core::view::{AnalysisView, AnalysisViewState, RequestState, TrendingView};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::watch;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod render;

const KST_OFFSET_SECS: i32 = 9 * 3600;

#[derive(Debug, Parser)]
#[command(name = "nrank", about = "Korean keyword trend dashboard powered by Gemini")]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show the trending-keyword dashboard (default).
    Dashboard {
        /// Print keywords and summary as JSON instead of the text dashboard.
        #[arg(long)]
        json: bool,
    },
    /// Run a deep SEO analysis of one keyword.
    Analyze {
        keyword: String,

        #[arg(long)]
        json: bool,
    },
    /// Keep both views open and drive them from stdin.
    Interactive,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = nrank_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer())
        .init();

    let args = Args::parse();

    if !settings.has_gemini_api_key() {
        tracing::warn!(
            "GEMINI_API_KEY is not set; the dashboard will show fallback keywords and analysis will fail"
        );
    }

    let config = GeminiConfig::from_settings(&settings);
    tracing::info!(model = %config.model, "starting nrank");
    let gateway: Arc<dyn KeywordInsights> = Arc::new(ProviderGateway::gemini(config)?);

    let result = match args.command.unwrap_or(Command::Dashboard { json: false }) {
        Command::Dashboard { json } => run_dashboard(gateway, json).await,
        Command::Analyze { keyword, json } => run_analyze(gateway, &keyword, json).await,
        Command::Interactive => run_interactive(gateway).await,
    };

    if let Err(err) = &result {
        sentry_anyhow::capture_anyhow(err);
    }
    result
}

async fn run_dashboard(gateway: Arc<dyn KeywordInsights>, json: bool) -> anyhow::Result<()> {
    let view = TrendingView::new(gateway);
    if let Some(handle) = view.mount() {
        handle.await.context("trending fetch task failed")?;
    }

    let RequestState::Ready(keywords) = view.state() else {
        anyhow::bail!("trending view did not reach a ready state");
    };

    if json {
        let summary = nrank_core::domain::summary::DashboardSummary::from_keywords(&keywords);
        let body = serde_json::json!({ "keywords": keywords, "summary": summary });
        println!("{}", serde_json::to_string_pretty(&body)?);
    } else {
        print!("{}", render::dashboard(&keywords, kst_now()?));
    }
    Ok(())
}

async fn run_analyze(
    gateway: Arc<dyn KeywordInsights>,
    keyword: &str,
    json: bool,
) -> anyhow::Result<()> {
    let view = AnalysisView::new(gateway);
    let Some(handle) = view.submit(keyword) else {
        anyhow::bail!("keyword must not be empty");
    };
    handle.await.context("analysis task failed")?;

    match view.state().request {
        RequestState::Ready(analysis) if json => {
            println!("{}", serde_json::to_string_pretty(&analysis)?);
            Ok(())
        }
        RequestState::Ready(analysis) => {
            print!("{}", render::analysis_report(&analysis));
            Ok(())
        }
        RequestState::Failed(notice) => anyhow::bail!("{notice}"),
        RequestState::Idle | RequestState::Loading => {
            anyhow::bail!("analysis view did not finish")
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum ReplCommand {
    Refresh,
    Dashboard,
    Analyze(String),
    Help,
    Quit,
    Unknown(String),
}

fn parse_repl_command(line: &str) -> Option<ReplCommand> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    let (head, rest) = match line.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (line, ""),
    };
    Some(match head {
        "r" | "refresh" => ReplCommand::Refresh,
        "d" | "dashboard" => ReplCommand::Dashboard,
        "a" | "analyze" => ReplCommand::Analyze(rest.to_string()),
        "h" | "help" | "?" => ReplCommand::Help,
        "q" | "quit" | "exit" => ReplCommand::Quit,
        _ => ReplCommand::Unknown(line.to_string()),
    })
}

const HELP: &str = "명령: r (새로고침) · d (대시보드 보기) · a <키워드> (키워드 분석) · q (종료)";

async fn run_interactive(gateway: Arc<dyn KeywordInsights>) -> anyhow::Result<()> {
    let trending = TrendingView::new(Arc::clone(&gateway));
    let analysis = AnalysisView::new(gateway);

    let renderer = tokio::spawn(render_loop(trending.subscribe(), analysis.subscribe()));
    let _ = trending.mount();
    println!("{HELP}");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("failed to read stdin")? {
        let Some(cmd) = parse_repl_command(&line) else {
            continue;
        };
        match cmd {
            ReplCommand::Refresh => {
                if trending.refresh().is_none() {
                    println!("이미 불러오는 중입니다.");
                }
            }
            ReplCommand::Dashboard => match trending.state() {
                RequestState::Ready(keywords) => {
                    print!("{}", render::dashboard(&keywords, kst_now()?));
                }
                other => print!("{}", render::trending_state(&other, kst_now()?)),
            },
            ReplCommand::Analyze(keyword) => {
                if keyword.trim().is_empty() {
                    println!("분석할 키워드를 입력하세요 (예: a 캠핑)");
                } else if analysis.submit(&keyword).is_none() {
                    println!("분석이 진행 중입니다. 완료 후 다시 시도하세요.");
                }
            }
            ReplCommand::Help => println!("{HELP}"),
            ReplCommand::Quit => break,
            ReplCommand::Unknown(line) => println!("알 수 없는 명령: {line}\n{HELP}"),
        }
    }

    // Dropping the views closes their channels and ends the render loop;
    // requests still in flight finish without effect.
    drop(trending);
    drop(analysis);
    renderer.await.context("render task failed")?;
    Ok(())
}

async fn render_loop(
    mut trending: watch::Receiver<TrendingState>,
    mut analysis: watch::Receiver<AnalysisViewState>,
) {
    loop {
        tokio::select! {
            changed = trending.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = trending.borrow_and_update().clone();
                match kst_now() {
                    Ok(now) => print!("{}", render::trending_state(&state, now)),
                    Err(err) => tracing::error!(error = %err, "failed to resolve KST time"),
                }
            }
            changed = analysis.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = analysis.borrow_and_update().clone();
                print!("{}", render::analysis_state(&state));
            }
        }
    }
}

fn kst_now() -> anyhow::Result<DateTime<FixedOffset>> {
    let kst = FixedOffset::east_opt(KST_OFFSET_SECS).context("invalid KST offset")?;
    Ok(chrono::Utc::now().with_timezone(&kst))
}

fn init_sentry(settings: &nrank_core::config::Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_repl_commands() {
        assert_eq!(parse_repl_command("  "), None);
        assert_eq!(parse_repl_command("r"), Some(ReplCommand::Refresh));
        assert_eq!(parse_repl_command("d"), Some(ReplCommand::Dashboard));
        assert_eq!(
            parse_repl_command("a  캠핑 장비 "),
            Some(ReplCommand::Analyze("캠핑 장비".to_string()))
        );
        assert_eq!(parse_repl_command("a"), Some(ReplCommand::Analyze(String::new())));
        assert_eq!(parse_repl_command("quit"), Some(ReplCommand::Quit));
        assert_eq!(
            parse_repl_command("zzz"),
            Some(ReplCommand::Unknown("zzz".to_string()))
        );
    }

    #[test]
    fn cli_defaults_to_dashboard() {
        let args = Args::try_parse_from(["nrank"]).unwrap();
        assert!(args.command.is_none());

        let args = Args::try_parse_from(["nrank", "analyze", "캠핑", "--json"]).unwrap();
        match args.command {
            Some(Command::Analyze { keyword, json }) => {
                assert_eq!(keyword, "캠핑");
                assert!(json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
