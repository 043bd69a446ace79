use clap::Parser;
use race_analyzer::app::commands::App;
use race_analyzer::config::toml_config::TomlConfig;
use race_analyzer::utils::error::ErrorSeverity;
use race_analyzer::core::ConfigProvider;
use race_analyzer::utils::{logger, validation::Validate};
use race_analyzer::{CliConfig, JsonFileStorage, Settings};

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    // 載入設定檔（若有指定）
    let mut settings = match &cli.config {
        Some(path) => match TomlConfig::from_file(path).and_then(|c| {
            c.validate()?;
            Ok(c)
        }) {
            Ok(config) => Settings::from_toml(&config),
            Err(e) => {
                eprintln!("❌ Failed to load config file '{}': {}", path, e);
                eprintln!("💡 Make sure the file exists and is valid TOML format");
                std::process::exit(1);
            }
        },
        None => Settings::default(),
    };
    cli.apply_to(&mut settings);

    // 初始化日誌
    if settings.log_json {
        logger::init_json_logger(cli.verbose, settings.log_level.as_deref());
    } else {
        logger::init_cli_logger(cli.verbose, settings.log_level.as_deref());
    }
    tracing::debug!("Settings: {:?}", settings);

    // 驗證配置
    if let Err(e) = settings.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let storage = JsonFileStorage::new(settings.data_path());
    let app = App::new(storage, settings);
    let mut stdout = std::io::stdout();

    if let Err(e) = app.run(cli.command, &mut stdout).await {
        // 記錄詳細錯誤信息
        tracing::error!(
            "❌ Command failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );

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
}
