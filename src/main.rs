use clap::Parser;
use smart_caixilho::app::{display, interactive};
use smart_caixilho::config::{Command, LeadsArgs, SubmitArgs};
use smart_caixilho::core::admin::hash_secret;
use smart_caixilho::core::questionnaire::{load_answers_file, parse_answer_list};
use smart_caixilho::core::{CompanyProfile, ConfigProvider, Ledger, Storage, Submission};
use smart_caixilho::utils::error::ErrorSeverity;
use smart_caixilho::utils::{logger, validation::Validate};
use smart_caixilho::{
    AdminGate, AppConfig, CliConfig, ConfiguredLedger, DiagError, DiagnosisEngine, LocalStorage,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    // 設定檔決定日誌格式，所以先讀設定
    let config = cli.load_app_config();
    let json_logs = matches!(&config, Ok(c) if c.log_format() == "json");
    if json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting smart-caixilho");
    cli.log_config_source();
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let result = match config {
        Ok(config) => run(&cli, config).await,
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        report_failure(&e);
    }

    Ok(())
}

async fn run(cli: &CliConfig, config: AppConfig) -> smart_caixilho::Result<()> {
    if let Command::HashSecret { secret } = &cli.command {
        println!("{}", hash_secret(secret));
        return Ok(());
    }
    if let Command::Questions = &cli.command {
        println!("{}", display::questions_text());
        return Ok(());
    }

    // 驗證配置
    config.validate()?;

    let storage = LocalStorage::new(config.output_path());
    let ledger = ConfiguredLedger::from_config(&config)?;
    let gate = AdminGate::new(config.admin_secret_sha256());
    let engine = DiagnosisEngine::new(ledger, storage, gate);

    match &cli.command {
        Command::Submit(args) => submit(&engine, args, config.output_path()).await,
        Command::Leads(args) => leads(&engine, args, config.output_path()).await,
        Command::HashSecret { .. } | Command::Questions => Ok(()),
    }
}

async fn submit<L: Ledger, S: Storage>(
    engine: &DiagnosisEngine<L, S>,
    args: &SubmitArgs,
    output_path: &str,
) -> smart_caixilho::Result<()> {
    let profile = CompanyProfile {
        company: args.company.clone(),
        responsible: args.responsible.clone(),
        phone: args.phone.clone(),
        email: args.email.clone(),
    };

    let (profile, answers) = match (&args.answers, &args.answers_file) {
        (Some(list), _) => (profile, parse_answer_list(list)?),
        (None, Some(path)) => {
            tracing::info!("📁 Loading answers from: {}", path);
            (profile, load_answers_file(path)?)
        }
        (None, None) => {
            let stdin = std::io::stdin();
            let mut input = stdin.lock();
            let mut output = std::io::stdout();
            let profile = interactive::prompt_profile(&mut input, &mut output, profile)?;
            let answers = interactive::prompt_answers(&mut input, &mut output)?;
            (profile, answers)
        }
    };

    let report = engine.submit(Submission { profile, answers }).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", display::summary_text(&report));
        println!("📁 {}/{}", output_path, report.report_file_name);
    }
    Ok(())
}

async fn leads<L: Ledger, S: Storage>(
    engine: &DiagnosisEngine<L, S>,
    args: &LeadsArgs,
    output_path: &str,
) -> smart_caixilho::Result<()> {
    let secret = args.secret.as_deref();

    if args.export {
        let export = engine.export_leads(secret).await?;
        println!(
            "📥 {} diagnóstico(s) exportado(s) para {}/{}",
            export.rows, output_path, export.file_name
        );
        return Ok(());
    }

    let records = engine.list_leads(secret).await?;
    println!("🕵️ Painel Interno de Leads (Consultoria)");
    if records.is_empty() {
        println!("Nenhum diagnóstico realizado ainda.");
    } else {
        println!("{}", display::leads_table(&records));
    }
    Ok(())
}

fn report_failure(e: &DiagError) {
    // 記錄詳細錯誤信息
    tracing::error!(
        "❌ Command failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

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
