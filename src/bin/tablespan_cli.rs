//! CLI tool for tablespan - reads a layout template and prints a summary
//!
//! Usage:
//!   tablespan_cli <layout.xml>                  # JSON summary to stdout
//!   tablespan_cli <layout.xml> -o out.json      # JSON summary to file
//!   tablespan_cli <layout.xml> --xml [-o out]   # Re-emit normalized XML

#![allow(clippy::exit)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::indexing_slicing)]

use std::env;
use std::fs;
use std::io::{self, Write};
use tablespan::{parse_layout, summarize_layout_xml, write_layout_xml, LayoutGrid, TextBinding};

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: tablespan_cli <layout.xml> [--xml] [-o output]");
        std::process::exit(1);
    }

    let input_path = &args[1];
    let rest = &args[2..];
    let emit_xml = rest.iter().any(|a| a == "--xml");
    let output_path = rest
        .iter()
        .position(|a| a == "-o")
        .and_then(|i| rest.get(i + 1));

    // Read input file
    let xml = match fs::read_to_string(input_path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error reading {}: {}", input_path, e);
            std::process::exit(1);
        }
    };

    let rendered = if emit_xml {
        let grid: LayoutGrid<TextBinding> = match parse_layout(&xml) {
            Ok(g) => g,
            Err(e) => {
                eprintln!("Error parsing layout: {}", e);
                std::process::exit(1);
            }
        };
        match write_layout_xml(&grid) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("Error writing layout: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        match summarize_layout_xml(&xml) {
            Ok(j) => j,
            Err(e) => {
                eprintln!("Error summarizing layout: {}", e);
                std::process::exit(1);
            }
        }
    };

    // Output
    match output_path {
        Some(path) => {
            if let Err(e) = fs::write(path, &rendered) {
                eprintln!("Error writing {}: {}", path, e);
                std::process::exit(1);
            }
            eprintln!("Written: {}", path);
        }
        None => {
            io::stdout().write_all(rendered.as_bytes()).unwrap();
            println!();
        }
    }
}
