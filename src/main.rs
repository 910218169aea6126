use std::{env, fs, path::PathBuf, process::ExitCode, time::Instant};

use minima::{
    driver::{check, generate, CompileOptions},
    errors::errors::{Error, ErrorTip},
    render_diagnostic,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const USAGE: &str = "usage: minimac <file> [-o <out.py>] [--allow-errors]";

struct Args {
    input: PathBuf,
    output: Option<PathBuf>,
    allow_errors: bool,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Args, String> {
    let mut input = None;
    let mut output = None;
    let mut allow_errors = false;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-o" | "--output" => match args.next() {
                Some(path) => output = Some(PathBuf::from(path)),
                None => return Err(format!("`{}` needs a file name", arg)),
            },
            "--allow-errors" => allow_errors = true,
            _ if arg.starts_with('-') => return Err(format!("unknown option `{}`", arg)),
            _ if input.is_some() => return Err(format!("unexpected argument `{}`", arg)),
            _ => input = Some(PathBuf::from(arg)),
        }
    }

    let Some(input) = input else {
        return Err(String::from("no input file"));
    };

    Ok(Args {
        input,
        output,
        allow_errors,
    })
}

fn init_tracing() {
    if env::var_os("RUST_LOG").is_none() {
        return;
    }

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> ExitCode {
    init_tracing();

    let args = match parse_args(env::args().skip(1)) {
        Ok(args) => args,
        Err(message) => {
            eprintln!("{}\n{}", message, USAGE);
            return ExitCode::from(2);
        }
    };

    let file_name = args
        .input
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| args.input.to_string_lossy().into_owned());

    let source = match fs::read_to_string(&args.input) {
        Ok(source) => source,
        Err(error) => {
            eprintln!("failed to read {}: {}", args.input.display(), error);
            return ExitCode::FAILURE;
        }
    };

    let options = CompileOptions {
        file_name,
        allow_semantic_errors: args.allow_errors,
        ..CompileOptions::default()
    };

    let start = Instant::now();
    let (program, analysis) = match check(&source) {
        Ok(checked) => checked,
        Err(error) => {
            display_error(&error, &source, &options.file_name);
            return ExitCode::FAILURE;
        }
    };

    for error in &analysis.errors {
        let headline = format!("{} ({})", error.kind, error.message);
        eprint!(
            "{}",
            render_diagnostic(&source, &options.file_name, error.position(), &headline)
        );
    }

    if !analysis.is_accepted() && !options.allow_semantic_errors {
        eprintln!(
            "{} semantic error(s); no code generated (pass --allow-errors to override)",
            analysis.errors.len()
        );
        return ExitCode::FAILURE;
    }

    let python = generate(&program, &analysis, &options);
    tracing::info!(file = %options.file_name, elapsed = ?start.elapsed(), "compiled");

    match &args.output {
        Some(path) => {
            if let Err(error) = fs::write(path, python) {
                eprintln!("failed to write {}: {}", path.display(), error);
                return ExitCode::FAILURE;
            }
        }
        None => print!("{}", python),
    }

    ExitCode::SUCCESS
}

fn display_error(error: &Error, source: &str, file: &str) {
    let headline = match error.get_tip() {
        ErrorTip::None => error.get_error_name().to_string(),
        tip => format!("{} ({})", error.get_error_name(), tip),
    };

    eprint!(
        "{}",
        render_diagnostic(source, file, *error.get_position(), &headline)
    );
}
