use anyhow::{anyhow, Context, Result};
use clap::{App, Arg, ArgMatches};
use httpc::{BodyEncoding, ClientConfig, Method, Session};
use log::LevelFilter;
use std::fs::read_to_string;
use std::time::Duration;

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn main() -> Result<()> {
    let matches = App::new("httpc")
        .version(VERSION)
        .about("Sends a single HTTP request and prints the response body")
        .arg(Arg::with_name("URL").required(true).index(1))
        .arg(
            Arg::with_name("METHOD")
                .short("X")
                .long("request")
                .possible_values(&["GET", "POST", "PUT", "PATCH", "DELETE", "OPTIONS"])
                .case_insensitive(true)
                .default_value("GET")
                .help("The request method"),
        )
        .arg(
            Arg::with_name("DATA")
                .short("d")
                .long("data")
                .takes_value(true)
                .multiple(true)
                .number_of_values(1)
                .validator(is_valid_field)
                .help("A key=value field to send, may be repeated"),
        )
        .arg(
            Arg::with_name("JSON")
                .short("j")
                .long("json")
                .help("Send the fields as a JSON object instead of key=value pairs"),
        )
        .arg(
            Arg::with_name("RAW")
                .long("raw")
                .takes_value(true)
                .conflicts_with("DATA")
                .help("A JSON document to send as the body"),
        )
        .arg(
            Arg::with_name("HEADER")
                .short("H")
                .long("header")
                .takes_value(true)
                .multiple(true)
                .number_of_values(1)
                .validator(is_valid_header)
                .help("A 'Name: value' header, may be repeated"),
        )
        .arg(
            Arg::with_name("COOKIE")
                .short("b")
                .long("cookie")
                .takes_value(true)
                .help("The Cookie header to send"),
        )
        .arg(
            Arg::with_name("REFERER")
                .short("e")
                .long("referer")
                .takes_value(true)
                .help("The Referer header to send"),
        )
        .arg(
            Arg::with_name("PROXY")
                .short("x")
                .long("proxy")
                .takes_value(true)
                .help("Route the request through this proxy, host:port or scheme://host:port"),
        )
        .arg(
            Arg::with_name("GZIP")
                .short("z")
                .long("gzip")
                .help("Gzip the request body"),
        )
        .arg(
            Arg::with_name("TIMEOUT")
                .short("t")
                .long("timeout")
                .takes_value(true)
                .validator(is_valid_timeout)
                .help("Request timeout in seconds [default: 30]"),
        )
        .arg(
            Arg::with_name("QUERY")
                .short("q")
                .long("query")
                .help("Append the fields to the query string of a GET request"),
        )
        .arg(
            Arg::with_name("CONFIG")
                .short("c")
                .long("config")
                .takes_value(true)
                .help("A JSON file with the client configuration"),
        )
        .arg(
            Arg::with_name("PRINT_COOKIES")
                .long("print-cookies")
                .help("Print the received cookies to stderr"),
        )
        .arg(
            Arg::with_name("VERBOSE")
                .short("v")
                .multiple(true)
                .help("Log more, may be repeated"),
        )
        .usage("httpc [OPTIONS] <URL>")
        .get_matches();

    init_logger(matches.occurrences_of("VERBOSE"));

    let config = match matches.value_of("CONFIG") {
        Some(path) => {
            let json = read_to_string(path)
                .with_context(|| format!("Failed opening config file: {:?}", path))?;
            ClientConfig::from_json(&json)
                .with_context(|| format!("Failed parsing config file: {:?}", path))?
        }
        None => ClientConfig::default(),
    };

    let mut session = Session::with_config(config);
    configure(&mut session, &matches)?;

    let url = matches.value_of("URL").unwrap();
    let method = parse_method(matches.value_of("METHOD").unwrap())?;
    let body = session
        .send(method, url)
        .with_context(|| format!("Error executing {} {}", method, url))?;

    println!("{}", body);
    if matches.is_present("PRINT_COOKIES") {
        eprintln!("{}", session.received_cookies());
    }
    Ok(())
}

fn configure(session: &mut Session, matches: &ArgMatches) -> Result<()> {
    if matches.is_present("JSON") {
        session.set_body_encoding(BodyEncoding::Json);
    }
    if matches.is_present("GZIP") {
        session.set_gzip_request_encoding(true);
    }
    if matches.is_present("QUERY") {
        session.set_query_from_fields(true);
    }
    if let Some(timeout) = matches.value_of("TIMEOUT") {
        session.set_timeout(Duration::from_secs(timeout.parse()?));
    }
    if let Some(proxy) = matches.value_of("PROXY") {
        session.set_proxy(proxy);
    }
    for header in matches.values_of("HEADER").into_iter().flatten() {
        let (name, value) = split_header(header)?;
        session.set_header(name, value);
    }
    if let Some(cookie) = matches.value_of("COOKIE") {
        session.set_cookie(cookie);
    }
    if let Some(referer) = matches.value_of("REFERER") {
        session.set_referer(referer);
    }
    for field in matches.values_of("DATA").into_iter().flatten() {
        let (key, value) = split_field(field)?;
        session.add_form_field(key, value);
    }
    if let Some(raw) = matches.value_of("RAW") {
        let raw: serde_json::Value =
            serde_json::from_str(raw).with_context(|| "Failed parsing --raw as JSON")?;
        session.set_raw_body(&raw)?;
    }
    Ok(())
}

fn init_logger(verbosity: u64) {
    let level = match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn parse_method(method: &str) -> Result<Method> {
    match method.to_ascii_uppercase().as_str() {
        "GET" => Ok(Method::Get),
        "POST" => Ok(Method::Post),
        "PUT" => Ok(Method::Put),
        "PATCH" => Ok(Method::Patch),
        "DELETE" => Ok(Method::Delete),
        "OPTIONS" => Ok(Method::Options),
        other => Err(anyhow!("Unsupported method '{}'", other)),
    }
}

fn split_field(field: &str) -> Result<(&str, &str)> {
    field
        .split_once('=')
        .ok_or_else(|| anyhow!("Field '{}' is not in key=value form", field))
}

fn split_header(header: &str) -> Result<(&str, &str)> {
    header
        .split_once(':')
        .map(|(name, value)| (name.trim(), value.trim()))
        .ok_or_else(|| anyhow!("Header '{}' is not in 'Name: value' form", header))
}

fn is_valid_field(val: String) -> Result<(), String> {
    match val.split_once('=') {
        Some((key, _)) if !key.is_empty() => Ok(()),
        _ => Err(String::from("Field must be in key=value form")),
    }
}

fn is_valid_header(val: String) -> Result<(), String> {
    match val.split_once(':') {
        Some((name, _)) if !name.trim().is_empty() => Ok(()),
        _ => Err(String::from("Header must be in 'Name: value' form")),
    }
}

fn is_valid_timeout(val: String) -> Result<(), String> {
    match val.parse::<u64>() {
        Ok(_) => Ok(()),
        Err(_) => Err(String::from("Timeout is not a valid number of seconds")),
    }
}
