use clap::Parser;
use roster_draw::config::cli::{Command, DrawArgs};
use roster_draw::core::eligibility::split_by_eligibility;
use roster_draw::core::invite::{MeetingDetails, MeetingReply};
use roster_draw::domain::ports::ConfigProvider;
use roster_draw::utils::error::{ErrorSeverity, RosterError};
use roster_draw::utils::logger;
use roster_draw::{CliConfig, CsvRosterStore, DrawEngine, FileOutbox, MessagePlan, Settings};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.log_json {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting roster-draw");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    // 載入並驗證配置
    let settings = match cli.load_settings() {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
    };

    let store = CsvRosterStore::with_columns(settings.roster_path(), settings.columns.clone());
    let outbox = FileOutbox::new(settings.outbox_path()).with_sender(settings.sender.clone());
    let engine = DrawEngine::new(store, outbox);

    let result = match &cli.command {
        Command::Draw(args) => run_draw(&engine, &settings, args).await,
        Command::Reset => run_reset(&engine).await,
        Command::Show => run_show(&engine).await,
        Command::Request { .. } => run_request(&engine, &settings).await,
    };

    if let Err(e) = result {
        // 記錄詳細錯誤信息
        tracing::error!(
            "❌ roster-draw failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

        // 根據錯誤嚴重程度決定退出碼
        let exit_code = match e.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };

        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }

    Ok(())
}

async fn run_draw(
    engine: &DrawEngine<CsvRosterStore, FileOutbox>,
    settings: &Settings,
    args: &DrawArgs,
) -> Result<(), RosterError> {
    let request = settings.draw_request();
    tracing::info!(
        group_size = request.group_size,
        use_sections = request.use_sections,
        "Drawing group from {}",
        settings.roster_path
    );

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - nothing will be recorded or sent");
        let outcome = engine.preview(&request).await?;
        print_members(&outcome.members);
        return Ok(());
    }

    let mut plan = MessagePlan::new(settings.subject.clone());
    plan.location_notes = settings.location_notes.clone();
    plan.topics = settings.topics.clone();

    if let Some(reply_path) = &args.reply {
        let text = std::fs::read_to_string(reply_path)?;
        plan.details = Some(MeetingDetails::from_reply(&MeetingReply::parse(&text))?);
    }

    let outcome = engine.run(&request, &plan).await?;
    print_members(&outcome.members);

    if let Some(receipt) = &outcome.receipt {
        println!("✅ Selections recorded in {}", settings.roster_path);
        println!("📁 Invitation written to: {}", receipt);
    }

    Ok(())
}

async fn run_reset(engine: &DrawEngine<CsvRosterStore, FileOutbox>) -> Result<(), RosterError> {
    let count = engine.reset().await?;
    println!("✅ Reset selection counts for {} records", count);
    Ok(())
}

async fn run_show(engine: &DrawEngine<CsvRosterStore, FileOutbox>) -> Result<(), RosterError> {
    let roster = engine.load_roster().await?;
    let split = split_by_eligibility(&roster);

    println!("📋 Roster ({} records):", roster.len());
    for record in roster.valid_records() {
        let marker = if split
            .eligible
            .iter()
            .any(|r| r.identity == record.identity)
        {
            " "
        } else {
            "-"
        };
        println!(
            " {} {:<30} {:<24} {:<8} {}",
            marker,
            record.identity,
            record.display_name,
            record.section.as_deref().unwrap_or("-"),
            record.selection_count
        );
    }

    match split.window {
        Some(window) if window.min_selection_count == window.max_selection_count => {
            println!("\nEveryone is eligible (all at {})", window.max_selection_count);
        }
        Some(window) => println!(
            "\nEligible: selection count below {} ({} eligible, {} held back)",
            window.max_selection_count,
            split.eligible.len(),
            split.ineligible.len()
        ),
        None => println!("\nNo selectable records"),
    }

    Ok(())
}

async fn run_request(
    engine: &DrawEngine<CsvRosterStore, FileOutbox>,
    settings: &Settings,
) -> Result<(), RosterError> {
    let organizer =
        roster_draw::utils::validation::validate_required_field("organizer", &settings.organizer)?;
    let receipt = engine
        .request_details(organizer, &settings.request_subject)
        .await?;
    println!("📁 Details request written to: {}", receipt);
    Ok(())
}

fn print_members(members: &[(String, String)]) {
    println!("👥 Group ({} members):", members.len());
    for (identity, name) in members {
        println!("  {} <{}>", name, identity);
    }
}
