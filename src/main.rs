mod backend;
mod cli;
mod completions;
mod document;
mod error;
mod labels;
mod mode;
mod provider;
mod tables;
mod workspace;

use backend::Backend;
use tower_lsp::{LspService, Server};

fn main() {
    let args: Vec<String> = std::env::args().collect();

    match args.get(1).map(|s| s.as_str()) {
        Some("complete") => {
            let code = cli::run_complete(&args[2..]);
            std::process::exit(code);
        }
        Some("labels") => {
            let code = cli::run_labels(&args[2..]);
            std::process::exit(code);
        }
        Some("--help" | "-h") => {
            print_usage();
        }
        Some("--version" | "-V") => {
            println!("lc3-lsp {}", env!("CARGO_PKG_VERSION"));
        }
        _ => {
            run_lsp();
        }
    }
}

fn print_usage() {
    println!("lc3-lsp {}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Usage:");
    println!("  lc3-lsp                                          Start LSP server (stdin/stdout)");
    println!("  lc3-lsp complete <file> <line> <column> [mode] [prefix]");
    println!("                                                   Print completions as CSV");
    println!("  lc3-lsp labels <files-or-dirs>                   Print inferred labels as CSV");
    println!("  lc3-lsp --help                                   Show this help");
    println!("  lc3-lsp --version                                Show version");
}

#[tokio::main]
async fn run_lsp() {
    env_logger::init();

    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();

    let (service, socket) = LspService::build(Backend::new).finish();

    Server::new(stdin, stdout, socket).serve(service).await;
}
