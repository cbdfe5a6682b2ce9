use clap::{Parser, Subcommand};
use genson::build::{self, BuildOptions};
use genson::{config, output};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "genson")]
#[command(about = "Static blog generator for date-stamped Markdown posts")]
#[command(long_about = "\
Static blog generator for date-stamped Markdown posts

Every .md file in the input directory is a post. Its first line is the title;
the page is filed under the file's creation date:

  posts/                          blog/
  ├── config.toml   (optional)    ├── index.html       front page with previews
  ├── hello.md              →     ├── toc.html         table of contents
  └── notes.md                    ├── template/        template assets
                                  └── 2024/03/05/hello-world/index.html

The template is a single HTML file (or a directory holding exactly one) with
plain tokens: INSERT_POST_HERE, INSERT_TITLE_HERE, SITE_ROOT, TEMPLATE_ROOT,
CSS_FILE, JS_FILE, POST_CREATED, POST_MODIFIED.

Wrap a passage in PREVIEW_START / PREVIEW_END to show it on the front page.

Run 'genson gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Directory holding the Markdown posts
    #[arg(long, short, default_value = ".", global = true)]
    input: PathBuf,

    /// Output directory
    #[arg(long, short, default_value = "blog", global = true)]
    output: PathBuf,

    /// Template file, directory holding one .html file, or bare template name
    #[arg(long, short, default_value = "template", global = true)]
    template: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Convert every post and write the site
    Build,
    /// Validate posts, config and template without writing anything
    Check,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let opts = BuildOptions {
        input: cli.input,
        output: cli.output,
        template: cli.template,
    };

    let result = match cli.command {
        Command::Build => run_build(&opts),
        Command::Check => run_check(&opts),
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run_build(opts: &BuildOptions) -> Result<(), build::BuildError> {
    println!("==> Building {} \u{2192} {}", opts.input.display(), opts.output.display());

    let (tx, rx) = std::sync::mpsc::channel();
    let printer = std::thread::spawn(move || {
        for event in rx {
            output::print_build_event(&event);
        }
    });
    // The sender is dropped when build returns, which ends the printer loop.
    let result = build::build(opts, Some(tx));
    printer.join().expect("progress printer panicked");

    let report = result?;
    output::print_build_summary(&report);
    println!("==> Build complete: {}", opts.output.display());
    Ok(())
}

fn run_check(opts: &BuildOptions) -> Result<(), build::BuildError> {
    println!("==> Checking {}", opts.input.display());
    let report = build::check(opts)?;
    output::print_check_output(&report);
    println!("==> Posts are valid");
    Ok(())
}
