use fern::colors::{Color, ColoredLevelConfig};
use log::LevelFilter;

/// Install the stderr logger. Records look like `debug: message`, with the
/// level colored.
pub fn init(level: LevelFilter) -> Result<(), log::SetLoggerError> {
    let colors = ColoredLevelConfig::new()
        .error(Color::Red)
        .warn(Color::Yellow)
        .info(Color::Blue)
        .debug(Color::Magenta)
        .trace(Color::Green);

    fern::Dispatch::new()
        .format(move |out, message, record| {
            out.finish(format_args!(
                "{}: {}",
                colors.color(record.level()).to_string().to_lowercase(),
                message
            ))
        })
        .level(level)
        .chain(std::io::stderr())
        .apply()
}
