use clap::{Args, Parser, Subcommand};
use ferrous_doh_domain::config::{ResolverNetwork, SourceApi};
use ferrous_doh_domain::CliOverrides;

#[derive(Parser, Debug)]
#[command(name = "ferrous-doh")]
#[command(version)]
#[command(about = "Ferrous DoH - DNS-over-HTTPS client, multi-source resolver and forwarding server")]
pub struct Cli {
    /// Configuration file path
    #[arg(short = 'c', long, value_name = "FILE", global = true)]
    pub config: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Resolve domains against several DoH providers and print JSON answers
    Query(QueryArgs),

    /// Serve /dns-query and forward to upstream DoH servers
    Serve(ServeArgs),
}

/// Outbound HTTP client options shared by both commands.
#[derive(Args, Debug, Default)]
pub struct HttpArgs {
    /// Resolve DoH server names through this DNS server (IP:PORT)
    #[arg(long, value_name = "ADDR")]
    pub resolver_addr: Option<String>,

    /// Network used to reach --resolver-addr (udp, tcp)
    #[arg(long, value_name = "NETWORK")]
    pub resolver_network: Option<ResolverNetwork>,

    /// Retries for connection errors, 429 and 5xx (0 disables)
    #[arg(long, value_name = "N")]
    pub retry_max: Option<u32>,

    /// Skip TLS certificate verification
    #[arg(short = 'k', long)]
    pub insecure_skip_verify: bool,
}

#[derive(Args, Debug)]
pub struct QueryArgs {
    /// Domains to resolve
    #[arg(required = true, value_name = "DOMAIN")]
    pub domains: Vec<String>,

    /// Record type (A, AAAA, MX, TXT, TYPE65, ...)
    #[arg(short = 't', long = "type", value_name = "TYPE")]
    pub record_type: Option<String>,

    /// Comma-separated provider names or DoH URLs
    #[arg(short = 's', long, value_delimiter = ',', value_name = "SOURCES")]
    pub sources: Option<Vec<String>>,

    /// Body format spoken to providers (message, json)
    #[arg(long, value_name = "API")]
    pub api: Option<SourceApi>,

    /// Overall deadline in seconds
    #[arg(long, value_name = "SECS", conflicts_with = "no_timeout")]
    pub timeout: Option<u64>,

    /// Run without a deadline
    #[arg(long)]
    pub no_timeout: bool,

    /// Stop after this many answers
    #[arg(short = 'l', long, value_name = "N", conflicts_with = "no_limit")]
    pub limit: Option<usize>,

    /// Print every answer
    #[arg(long)]
    pub no_limit: bool,

    /// Concurrent in-flight queries across built-in sources
    #[arg(short = 'w', long, value_name = "N")]
    pub workers: Option<usize>,

    /// Log failed sources at warn level
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Wrap each answer with the name of the source that produced it
    #[arg(long)]
    pub labels: bool,

    /// Print one JSON array at the end instead of one line per answer
    #[arg(short = 'j', long)]
    pub joined: bool,

    /// Label for --custom-source-url
    #[arg(long, value_name = "NAME")]
    pub custom_source_name: Option<String>,

    /// Extra DoH endpoint to query
    #[arg(long, value_name = "URL")]
    pub custom_source_url: Option<String>,

    /// Query only the custom source
    #[arg(long, requires = "custom_source_url")]
    pub custom_only: bool,

    #[command(flatten)]
    pub http: HttpArgs,
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Bind address
    #[arg(short = 'b', long, value_name = "ADDR")]
    pub bind: Option<String>,

    /// Listen port
    #[arg(short = 'p', long)]
    pub port: Option<u16>,

    /// Upstream DoH URL, tried in the order given (repeatable)
    #[arg(short = 'u', long = "upstream", value_name = "URL")]
    pub upstreams: Vec<String>,

    #[command(flatten)]
    pub http: HttpArgs,
}

impl Cli {
    pub fn overrides(&self) -> CliOverrides {
        let mut overrides = CliOverrides {
            log_level: self.log_level.clone(),
            ..CliOverrides::default()
        };

        let http = match &self.command {
            Command::Query(args) => {
                overrides.record_type = args.record_type.clone();
                overrides.sources = args.sources.clone();
                overrides.api = args.api;
                overrides.timeout_secs = args.timeout;
                overrides.no_timeout = args.no_timeout;
                overrides.limit = args.limit;
                overrides.no_limit = args.no_limit;
                overrides.workers = args.workers;
                overrides.verbose = args.verbose;
                overrides.labels = args.labels;
                overrides.joined = args.joined;
                overrides.custom_source_name = args.custom_source_name.clone();
                overrides.custom_source_url = args.custom_source_url.clone();
                overrides.custom_only = args.custom_only;
                &args.http
            }
            Command::Serve(args) => {
                overrides.bind_address = args.bind.clone();
                overrides.port = args.port;
                overrides.upstream_servers = Some(args.upstreams.clone());
                &args.http
            }
        };

        overrides.resolver_addr = http.resolver_addr.clone();
        overrides.resolver_network = http.resolver_network;
        overrides.retry_max = http.retry_max;
        overrides.insecure_skip_verify = http.insecure_skip_verify;

        overrides
    }
}
