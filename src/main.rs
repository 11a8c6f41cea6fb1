use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use qrstyle::config::{LOGO_PADDING_RANGE, LOGO_SCALE_RANGE, MODULE_SIZE_RANGE};
use qrstyle::palette::DEFAULT_PALETTE_SIZE;
use qrstyle::render::{to_ascii_string, QUIET_ZONE};
use qrstyle::session::{DOWNLOAD_FILE_NAME, PREVIEW_WIDTH};
use qrstyle::{Color, ColorSlot, ErrorKind, Input, Logo, LogoFit, Session, Style};

/// Generate a styled QR code, optionally with a logo in the middle.
#[derive(Parser, Debug)]
#[command(name = "qrstyle", version, about)]
struct Cli {
    /// Text to encode
    text: Option<String>,

    /// Image (PNG/JPEG) to embed in the center of the code
    #[arg(short, long)]
    logo: Option<PathBuf>,

    /// JSON style file; flags below override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Foreground color (#rrggbb)
    #[arg(long)]
    fg: Option<Color>,

    /// Background color (#rrggbb)
    #[arg(long)]
    bg: Option<Color>,

    /// Pixels per module
    #[arg(short = 's', long, value_parser = parse_module_size)]
    module_size: Option<u32>,

    /// Logo size as a fraction of the code size
    #[arg(long, value_parser = parse_logo_scale)]
    logo_scale: Option<f32>,

    /// Frame around the logo, in pixels
    #[arg(short, long, value_parser = parse_padding)]
    padding: Option<u32>,

    /// Color of the frame around the logo (#rrggbb)
    #[arg(long)]
    padding_color: Option<Color>,

    /// How the logo is fitted into its box
    #[arg(long, value_enum)]
    fit: Option<LogoFit>,

    /// Number of colors suggested from the logo
    #[arg(long, default_value_t = DEFAULT_PALETTE_SIZE)]
    palette: usize,

    /// Use suggested color number N as the foreground
    #[arg(long, value_name = "N")]
    fg_suggestion: Option<usize>,

    /// Use suggested color number N as the background
    #[arg(long, value_name = "N")]
    bg_suggestion: Option<usize>,

    /// Use suggested color number N for the logo frame
    #[arg(long, value_name = "N")]
    padding_suggestion: Option<usize>,

    /// Where to write the PNG
    #[arg(short, long, default_value = DOWNLOAD_FILE_NAME)]
    output: PathBuf,

    /// Also write a preview scaled to the display width
    #[arg(long)]
    preview: Option<PathBuf>,

    /// Print the code to the terminal
    #[arg(long)]
    ascii: bool,
}

fn parse_in_range<T>(value: &str, range: &std::ops::RangeInclusive<T>) -> Result<T, String>
where
    T: std::str::FromStr + PartialOrd + std::fmt::Display,
{
    let parsed: T = value.parse().map_err(|_| format!("`{value}` is not a number"))?;
    if range.contains(&parsed) {
        Ok(parsed)
    } else {
        Err(format!("must be between {} and {}", range.start(), range.end()))
    }
}

fn parse_module_size(value: &str) -> Result<u32, String> {
    parse_in_range(value, &MODULE_SIZE_RANGE)
}

fn parse_logo_scale(value: &str) -> Result<f32, String> {
    parse_in_range(value, &LOGO_SCALE_RANGE)
}

fn parse_padding(value: &str) -> Result<u32, String> {
    parse_in_range(value, &LOGO_PADDING_RANGE)
}

impl Cli {
    /// Inputs in the order a user would set them: content first, then style, then picks.
    fn inputs(&self, style: Style) -> qrstyle::Result<Vec<Input>> {
        let mut inputs = vec![Input::Style(style)];
        if let Some(path) = &self.logo {
            inputs.push(Input::Logo(Some(Logo::open(path)?)));
        }
        inputs.push(Input::Text(self.text.clone().unwrap_or_default()));

        inputs.extend(self.fg.map(Input::Foreground));
        inputs.extend(self.bg.map(Input::Background));
        inputs.extend(self.module_size.map(Input::ModuleSize));
        inputs.extend(self.logo_scale.map(Input::LogoScale));
        inputs.extend(self.padding.map(Input::LogoPadding));
        inputs.extend(self.padding_color.map(Input::PaddingColor));
        inputs.extend(self.fit.map(Input::LogoFit));

        let picks = [
            (ColorSlot::Foreground, self.fg_suggestion),
            (ColorSlot::Background, self.bg_suggestion),
            (ColorSlot::Padding, self.padding_suggestion),
        ];
        for (slot, index) in picks {
            if let Some(index) = index {
                inputs.push(Input::AdoptSuggestion { slot, index });
            }
        }
        Ok(inputs)
    }
}

fn run(cli: &Cli) -> qrstyle::Result<()> {
    let style = match &cli.config {
        Some(path) => Style::from_json_file(path)?,
        None => Style::default(),
    };

    let mut session = Session::default().with_palette_size(cli.palette);
    for input in cli.inputs(style)? {
        session.apply(input)?;
    }
    let (width, height) = session.render()?.dimensions();

    let suggestions = session.suggestions()?;
    if !suggestions.is_empty() {
        println!("Suggested colors:");
        for (i, hex) in suggestions.iter().enumerate() {
            println!("  {i}: {hex}");
        }
    }

    if cli.ascii {
        print!("{}", to_ascii_string(session.code()?, QUIET_ZONE));
    }

    if let Some(path) = &cli.preview {
        session.preview(PREVIEW_WIDTH)?.save(path)?;
        log::info!("Wrote preview to {}", path.display());
    }

    let download = session.download()?;
    std::fs::write(&cli.output, &download.bytes)?;
    log::info!("Wrote {}x{} code to {}", width, height, cli.output.display());
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            match err.kind() {
                ErrorKind::Validation | ErrorKind::Config => ExitCode::from(2),
                ErrorKind::Image | ErrorKind::Encoding | ErrorKind::Io => ExitCode::FAILURE,
            }
        }
    }
}
