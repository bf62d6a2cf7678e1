//! Loupe application binary - composition root.
//!
//! Ties together the Loupe crates into a single executable:
//! 1. Parse CLI args and load configuration from TOML
//! 2. Probe the backend's /health endpoint and pick the execution
//!    strategy (remote, or the local sample catalog as fallback)
//! 3. Run a line-oriented chat loop: plain lines are questions, `:`
//!    commands page through, export, and clear results

mod cli;
mod render;

use std::io::Write as _;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};

use loupe_chat::{ConversationStore, QueryOrchestrator};
use loupe_core::{LoupeConfig, QueryResult};
use loupe_query::{HealthChecker, HttpTransport, MockStrategy, QueryStrategy, RemoteStrategy};
use loupe_table::{columns, export_filename, to_csv};

use cli::CliArgs;

const EXAMPLE_QUESTIONS: &[&str] = &[
    "총 이벤트 수를 알려주세요",
    "가장 많이 발생한 이벤트 유형 상위 10개는?",
    "국가별 사용자 수를 보여주세요",
    "기기 카테고리별 사용자 비율은?",
    "시간대별 이벤트 수를 알려주세요",
    "운영체제별 사용자 분포를 보여주세요",
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // Config.
    let config_file = args.resolve_config_path();
    let config = LoupeConfig::load_or_default(&config_file);

    // Tracing.
    let log_level = args.resolve_log_level(&config.general.log_level);
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .init();

    tracing::info!("Starting Loupe v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(path = %config_file.display(), "Configuration loaded");

    // Strategy selection: explicit mock wins, otherwise probe the backend
    // and fall back to the sample catalog when it is not healthy.
    let backend_url = args.resolve_backend_url(&config.backend.base_url);
    let strategy = if args.mock || config.chat.use_mock {
        tracing::info!("Mock strategy selected");
        QueryStrategy::Mock(MockStrategy::new())
    } else {
        let transport = HttpTransport::new(backend_url.clone())
            .with_health_timeout(Duration::from_secs(config.backend.health_timeout_secs));
        let report = HealthChecker::new(transport.clone()).check().await;
        if report.healthy {
            tracing::info!(url = %backend_url, "Backend healthy, remote strategy selected");
            QueryStrategy::Remote(RemoteStrategy::new(transport))
        } else {
            tracing::warn!(detail = %report.detail, "Backend unhealthy, falling back to mock");
            println!("{}", report.detail);
            println!("목업 데이터 모드로 전환합니다.");
            QueryStrategy::Mock(MockStrategy::new())
        }
    };

    println!("Loupe — GA4 데이터에 대해 질문해보세요. (:examples 로 예시, :quit 으로 종료)");

    let store = Arc::new(ConversationStore::new());
    let orchestrator = QueryOrchestrator::new(Arc::clone(&store));
    chat_loop(&orchestrator, &strategy, &config).await;

    Ok(())
}

/// Read lines from stdin until EOF or `:quit`.
async fn chat_loop(orchestrator: &QueryOrchestrator, strategy: &QueryStrategy, config: &LoupeConfig) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut last_result: Option<QueryResult> = None;

    prompt();
    while let Ok(Some(line)) = lines.next_line().await {
        let line = line.trim();
        match parse_command(line) {
            Command::Quit => break,
            Command::Nothing => {}
            Command::Examples(None) => {
                for (i, question) in EXAMPLE_QUESTIONS.iter().enumerate() {
                    println!("  {}. {}", i + 1, question);
                }
                println!("(:examples <번호> 로 바로 질문할 수 있습니다)");
            }
            Command::Examples(Some(n)) => match EXAMPLE_QUESTIONS.get(n.wrapping_sub(1)) {
                Some(question) => {
                    // Same flow as typing the question: stage it as the
                    // draft, then send.
                    if let Err(e) = orchestrator.store().set_current_question(question) {
                        tracing::error!(error = %e, "failed to stage example question");
                    }
                    println!("> {}", question);
                    match orchestrator.ask(question, strategy).await {
                        Ok(()) => {
                            last_result = latest_result(orchestrator);
                            print_latest(orchestrator, &last_result, config);
                        }
                        Err(e) => println!("{}", e),
                    }
                }
                None => println!("예시 번호는 1부터 {}까지입니다.", EXAMPLE_QUESTIONS.len()),
            },
            Command::Clear => {
                if let Err(e) = orchestrator.store().clear() {
                    tracing::error!(error = %e, "failed to clear conversation");
                }
                last_result = None;
                println!("대화를 초기화했습니다.");
            }
            Command::Page(requested) => match (&last_result, requested) {
                (Some(result), Some(n)) => {
                    print!("{}", render::render_table(result, n, &config.table));
                }
                (Some(_), None) => println!("사용법: :page <번호>"),
                (None, _) => println!("표시할 결과가 없습니다."),
            },
            Command::Export(path) => match &last_result {
                Some(result) => export_csv(result, path),
                None => println!("내보낼 결과가 없습니다."),
            },
            Command::Unknown(name) => println!("알 수 없는 명령입니다: :{}", name),
            Command::Ask(question) => {
                match orchestrator.ask(question, strategy).await {
                    Ok(()) => {
                        last_result = latest_result(orchestrator);
                        print_latest(orchestrator, &last_result, config);
                    }
                    Err(e) => println!("{}", e),
                }
            }
        }
        prompt();
    }
}

enum Command<'a> {
    Ask(&'a str),
    Page(Option<usize>),
    Export(Option<&'a str>),
    Clear,
    Examples(Option<usize>),
    Quit,
    Unknown(&'a str),
    Nothing,
}

fn parse_command(line: &str) -> Command<'_> {
    if line.is_empty() {
        return Command::Nothing;
    }
    let Some(rest) = line.strip_prefix(':') else {
        return Command::Ask(line);
    };
    let mut parts = rest.splitn(2, char::is_whitespace);
    let name = parts.next().unwrap_or_default();
    let arg = parts.next().map(str::trim).filter(|a| !a.is_empty());
    match name {
        "quit" | "exit" => Command::Quit,
        "examples" => Command::Examples(arg.and_then(|a| a.parse().ok())),
        "clear" => Command::Clear,
        "page" => Command::Page(arg.and_then(|a| a.parse().ok())),
        "export" => Command::Export(arg),
        _ => Command::Unknown(name),
    }
}

/// The result attached to the most recent assistant message, if any.
fn latest_result(orchestrator: &QueryOrchestrator) -> Option<QueryResult> {
    let state = orchestrator.store().snapshot().ok()?;
    state
        .messages
        .iter()
        .rev()
        .find_map(|message| message.result.clone())
}

fn print_latest(
    orchestrator: &QueryOrchestrator,
    last_result: &Option<QueryResult>,
    config: &LoupeConfig,
) {
    let Ok(state) = orchestrator.store().snapshot() else {
        return;
    };
    if let Some(message) = state.messages.last() {
        println!("{}", message.content);
    }
    if let Some(result) = last_result {
        print!("{}", render::render_table(result, 1, &config.table));
    }
}

fn export_csv(result: &QueryResult, path: Option<&str>) {
    let headers = columns(&result.rows);
    let csv = to_csv(&result.rows, &headers);
    let path = path
        .map(str::to_string)
        .unwrap_or_else(|| export_filename(chrono::Local::now().date_naive()));
    match std::fs::write(&path, csv) {
        Ok(()) => println!("CSV 파일을 저장했습니다: {}", path),
        Err(e) => {
            tracing::error!(error = %e, path = %path, "CSV export failed");
            println!("CSV 파일 저장에 실패했습니다: {}", e);
        }
    }
}

fn prompt() {
    print!("> ");
    let _ = std::io::stdout().flush();
}

// =============================================================================
// Tests
// =============================================================================
