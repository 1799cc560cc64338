//! MoLang CLI
//!
//! Evaluate, inspect and golden-test MoLang expressions.

use std::path::PathBuf;

use molangc::commands::{
    eval_expr, lex_expr, parse_expr, parse_run_options, run_golden, run_repl,
};
use molangc::init_tracing;

fn main() {
    init_tracing();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        return;
    }

    let command = &args[1];

    match command.as_str() {
        "eval" => {
            let (options, rest) = parse_run_options(&args[2..]);
            if rest.is_empty() {
                eprintln!("Usage: molang eval <expression> [options]");
                eprintln!();
                print_run_options();
                std::process::exit(1);
            }
            eval_expr(&rest.join(" "), &options);
        }
        "repl" => {
            let (options, _) = parse_run_options(&args[2..]);
            run_repl(&options);
        }
        "golden" => {
            if args.len() < 3 {
                eprintln!("Usage: molang golden <fixture> [-o <path>] [options]");
                eprintln!();
                eprintln!("Options:");
                eprintln!("  -o <path>                  Write to a file instead of stdout");
                print_run_options();
                std::process::exit(1);
            }

            // -o needs lookahead
            let mut output = None;
            let mut rest = Vec::new();
            let mut i = 3;
            while i < args.len() {
                if args[i] == "-o" && i + 1 < args.len() {
                    output = Some(PathBuf::from(&args[i + 1]));
                    i += 2;
                } else {
                    rest.push(args[i].clone());
                    i += 1;
                }
            }
            let (options, _) = parse_run_options(&rest);
            run_golden(&args[2], output.as_deref(), &options);
        }
        "lex" => {
            if args.len() < 3 {
                eprintln!("Usage: molang lex <expression>");
                std::process::exit(1);
            }
            lex_expr(&args[2..].join(" "));
        }
        "parse" => {
            if args.len() < 3 {
                eprintln!("Usage: molang parse <expression>");
                std::process::exit(1);
            }
            parse_expr(&args[2..].join(" "));
        }
        "help" | "--help" | "-h" => {
            print_usage();
        }
        "version" | "--version" | "-v" => {
            println!("MoLang {}", env!("CARGO_PKG_VERSION"));
        }
        _ => {
            eprintln!("Unknown command: {command}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    }
}

fn print_run_options() {
    eprintln!("  --cache-capacity=<n>       Bound the compilation cache (LRU)");
    eprintln!("  --max-loop-iterations=<n>  Cap on loop() iterations");
    eprintln!("  --seed=<n>                 Seed for math.random*");
}

fn print_usage() {
    println!("MoLang expression engine");
    println!();
    println!("Usage: molang <command> [options]");
    println!();
    println!("Commands:");
    println!("  eval <expression>    Compile and evaluate an expression");
    println!("  repl                 Evaluate one expression per stdin line");
    println!("  golden <fixture>     Render expected results for a fixture file");
    println!("  lex <expression>     Tokenize and display tokens");
    println!("  parse <expression>   Parse and display the syntax tree");
    println!("  help                 Show this help message");
    println!("  version              Show version information");
    println!();
    println!("Run options (eval, repl, golden):");
    println!("  --cache-capacity=<n>       Bound the compilation cache (LRU)");
    println!("  --max-loop-iterations=<n>  Cap on loop() iterations");
    println!("  --seed=<n>                 Seed for math.random*");
    println!();
    println!("Logging:");
    println!("  RUST_LOG=molang_eval=debug       Cache and compile events");
    println!("  MOLANG_LOG_TREE=1                Indented span tree output");
    println!();
    println!("Examples:");
    println!("  molang eval \"math.clamp(10, 0, 5)\"");
    println!("  molang eval \"math.random(0, 1)\" --seed=42");
    println!("  molang golden fixtures/math.txt -o fixtures/math.golden");
    println!("  molang parse \"v.x = q.speed * 2\"");
}
