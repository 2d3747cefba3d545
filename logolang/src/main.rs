use clap::Parser;
use logolang_check::check;
use logolang_lasmgen::generate;
use logolang_syntax::{parse, Pos, Source};
use std::fmt::Display;
use std::path::PathBuf;
use std::process::exit;

#[derive(Parser, Debug)]
#[command(name = "logolang", about = "Compile Logo source into LogoVM assembly")]
struct CliArgs {
    /// Logo source file.
    filename: PathBuf,

    /// Write the LASM output here instead of standard output.
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,
}

fn main() {
    tracing_subscriber::fmt()
        .compact()
        .without_time()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = CliArgs::parse();

    let source = match Source::open(args.filename) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("cannot read source file: {err}");
            exit(1);
        }
    };

    let program = match parse(&source) {
        Ok(program) => program,
        Err(err) => report(&source, err.pos, err),
    };
    let analysis = match check(&source, &program) {
        Ok(analysis) => analysis,
        Err(err) => report(&source, err.pos, err),
    };
    let lasm = generate(&program, &analysis);

    match args.output {
        Some(path) => {
            if let Err(err) = std::fs::write(&path, &lasm) {
                eprintln!("cannot write {}: {err}", path.display());
                exit(1);
            }
        }
        None => print!("{lasm}"),
    }
}

fn report(source: &Source, pos: Pos, message: impl Display) -> ! {
    eprintln!("{}: {message}", source.location(pos));
    exit(1);
}
