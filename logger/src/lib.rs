use colored::{Color, Colorize};
use middleware::logger::LoggerMiddleware;

pub mod middleware {
    pub mod logger;
}

fn level_color(level: log::Level) -> Color {
    match level {
        log::Level::Error => Color::Red,
        log::Level::Warn => Color::Yellow,
        log::Level::Info => Color::Green,
        log::Level::Debug => Color::Magenta,
        log::Level::Trace => Color::BrightBlack,
    }
}

/// Installs the global logger.
///
/// Stdout gets short colored lines; `log_file` gets the same records with a
/// full date and no color codes on the level tag.
pub fn setup(log_file: &str, level: log::LevelFilter) -> Result<(), fern::InitError> {
    let stdout = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{}[{}][{}] {}",
                chrono::Local::now().format("[%H:%M:%S]"),
                record.target(),
                record.level().to_string().color(level_color(record.level())),
                message
            ))
        })
        .chain(std::io::stdout());

    let file = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{} {:<5} {} {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
                record.level(),
                record.target(),
                message
            ))
        })
        .chain(fern::log_file(log_file)?);

    fern::Dispatch::new()
        .level(level)
        .level_for("sqlx", log::LevelFilter::Warn)
        .level_for("hyper", log::LevelFilter::Off)
        .level_for("reqwest", log::LevelFilter::Info)
        .level_for("actix_server", log::LevelFilter::Info)
        .chain(stdout)
        .chain(file)
        .apply()?;
    Ok(())
}

/// Request logger: one line per request, bodies of failed requests at debug.
pub fn middleware() -> LoggerMiddleware {
    LoggerMiddleware::new()
}
