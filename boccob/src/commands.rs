use crate::handlers::parse_site;
use clap::{ArgAction, arg};

pub fn command_argument_builder() -> clap::Command {
    clap::Command::new("boccob")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("boccob")
        .about("Crawls one site and lists its pages, ranked by how often they are linked")
        .styles(CLAP_STYLING)
        .arg(
            arg!(-s --"site" <URL>)
                .required(true)
                .help("The base URL of the site to crawl (include http/https and subdomain)")
                .value_parser(parse_site),
        )
        .arg(
            arg!(-w --"workers" <NUM_WORKERS>)
                .required(false)
                .help("Concurrent fetches. 1 keeps the depth-first visiting order.")
                .value_parser(clap::value_parser!(usize))
                .default_value("1"),
        )
        .arg(
            arg!(--"max-depth" <HOPS>)
                .required(false)
                .help("Do not fetch pages more than this many links away from the site root")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(
            arg!(--"max-pages" <COUNT>)
                .required(false)
                .help("Stop fetching new pages once this many have been recorded")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(
            arg!(-i --"ignore" <KEYWORD>)
                .required(false)
                .help("Skip links containing KEYWORD (repeatable)")
                .action(ArgAction::Append),
        )
        .arg(
            arg!(--"no-default-ignores")
                .required(false)
                .help("Drop the built-in ignore list (css, js, html assets, '#', events)")
                .action(ArgAction::SetTrue),
        )
        .arg(
            arg!(--"weight" <POLICY>)
                .required(false)
                .help("How references to queued pages count: accumulate, or reset on fetch")
                .value_parser(["accumulate", "reset"])
                .default_value("accumulate"),
        )
        .arg(
            arg!(--"timeout" <SECONDS>)
                .required(false)
                .help("Request timeout in seconds (default: none)")
                .value_parser(clap::value_parser!(u64)),
        )
        .arg(
            arg!(-f --"format" <FORMAT>)
                .required(false)
                .help("Report format: text, csv, json, markdown")
                .value_parser(["text", "csv", "json", "markdown"])
                .default_value("text"),
        )
        .arg(
            arg!(--"sort" <ORDER>)
                .required(false)
                .help("Report row order")
                .value_parser(["discovery", "url", "weight"])
                .default_value("discovery"),
        )
        .arg(
            arg!(-o --"output" <PATH>)
                .required(false)
                .help("Save report to file (default: standard output)")
                .value_parser(clap::value_parser!(std::path::PathBuf)),
        )
        .arg(arg!(-q --"quiet" "Suppress the progress spinner and the crawl summary").required(false))
        .arg(
            arg!(-v --"verbose" "Log crawl decisions to stderr (-vv for every link)")
                .required(false)
                .action(ArgAction::Count),
        )
}

pub const CLAP_STYLING: clap::builder::styling::Styles = clap::builder::styling::Styles::styled()
    .header(clap_cargo::style::HEADER)
    .usage(clap_cargo::style::USAGE)
    .literal(clap_cargo::style::LITERAL)
    .placeholder(clap_cargo::style::PLACEHOLDER)
    .error(clap_cargo::style::ERROR)
    .valid(clap_cargo::style::VALID)
    .invalid(clap_cargo::style::INVALID);
