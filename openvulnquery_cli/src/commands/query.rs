use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;
use openvulnquery_api::types::AdvisoryFormat;
use openvulnquery_api::{Client, Filter, Topic, DEFAULT_USER_AGENT};

use crate::config;
use crate::output::{print_advisories, select_fields, OutputFormat};
use crate::validation::{parse_date_range, parse_latest, parse_year, DateRange, Severity};

/// The API resource to query. Exactly one is required.
#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
pub struct ResourceArgs {
    /// All advisories, narrowed by --first-published or --last-published
    #[arg(long)]
    pub all: bool,

    /// A single advisory by id (e.g. cisco-sa-20180328-smi2)
    #[arg(long)]
    pub advisory: Option<String>,

    /// Advisories covering a CVE id (e.g. CVE-2018-0171)
    #[arg(long)]
    pub cve: Option<String>,

    /// The N most recently published advisories (1-100)
    #[arg(long, value_parser = parse_latest)]
    pub latest: Option<u32>,

    /// Advisories with the given Security Impact Rating
    #[arg(long, value_enum)]
    pub severity: Option<Severity>,

    /// Advisories published in a year (YYYY)
    #[arg(long, value_parser = parse_year)]
    pub year: Option<i32>,

    /// Advisories mentioning a product name
    #[arg(long)]
    pub product: Option<String>,

    /// Advisories affecting an IOS release (e.g. 15.1(4)M2)
    #[arg(long)]
    pub ios: Option<String>,

    /// Advisories affecting an IOS XE release (e.g. 3.16.1aS)
    #[arg(long = "ios-xe")]
    pub ios_xe: Option<String>,
}

#[derive(Args, Debug)]
pub struct QueryArgs {
    #[command(flatten)]
    pub resource: ResourceArgs,

    /// Path to a JSON file with CLIENT_ID and CLIENT_SECRET
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Request CVRF advisories (default)
    #[arg(long, conflicts_with = "oval")]
    pub cvrf: bool,

    /// Request OVAL advisories
    #[arg(long)]
    pub oval: bool,

    /// Only advisories first published in START:END (YYYY-MM-DD:YYYY-MM-DD)
    #[arg(long, value_parser = parse_date_range, conflicts_with = "last_published")]
    pub first_published: Option<DateRange>,

    /// Only advisories last updated in START:END (YYYY-MM-DD:YYYY-MM-DD)
    #[arg(long, value_parser = parse_date_range)]
    pub last_published: Option<DateRange>,

    /// Output format: table, json or csv
    #[arg(long, default_value = "table")]
    pub output: String,

    /// Comma-separated columns to show (e.g. advisory_id,sir,cves)
    #[arg(long, value_delimiter = ',')]
    pub fields: Vec<String>,

    /// Print only the number of advisories found
    #[arg(long)]
    pub count: bool,

    /// User agent sent with every request
    #[arg(long, default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,
}

/// A query resolved from the command line, ready for dispatch.
#[derive(Debug, PartialEq)]
pub struct ResolvedQuery {
    pub topic: Topic,
    pub format: AdvisoryFormat,
    pub aspect: String,
    pub filter: Filter,
}

impl ResolvedQuery {
    /// Format of the advisories the query returns.
    pub fn result_format(&self) -> AdvisoryFormat {
        match self.topic {
            Topic::Ios | Topic::IosXe => AdvisoryFormat::Ios,
            _ => self.format,
        }
    }
}

pub fn resolve(args: &QueryArgs) -> Result<ResolvedQuery> {
    let r = &args.resource;
    let (topic, aspect) = if r.all {
        (Topic::All, "all".to_string())
    } else if let Some(ref id) = r.advisory {
        (Topic::Advisory, id.trim().to_string())
    } else if let Some(ref cve) = r.cve {
        (Topic::Cve, cve.trim().to_string())
    } else if let Some(latest) = r.latest {
        (Topic::Latest, latest.to_string())
    } else if let Some(severity) = r.severity {
        (Topic::Severity, severity.as_str().to_string())
    } else if let Some(year) = r.year {
        (Topic::Year, year.to_string())
    } else if let Some(ref product) = r.product {
        (Topic::Product, product.trim().to_string())
    } else if let Some(ref version) = r.ios {
        (Topic::Ios, version.trim().to_string())
    } else if let Some(ref version) = r.ios_xe {
        (Topic::IosXe, version.trim().to_string())
    } else {
        bail!("no API resource selected");
    };

    if aspect.is_empty() {
        bail!("--{} requires a non-empty value", topic.as_str().replace('_', "-"));
    }

    let filter = match (&args.first_published, &args.last_published) {
        (Some(range), _) => Filter::first_published(&range.start_str(), &range.end_str()),
        (None, Some(range)) => Filter::last_published(&range.start_str(), &range.end_str()),
        (None, None) => Filter::Empty,
    };

    match topic {
        Topic::All if filter == Filter::Empty => {
            bail!("--all requires --first-published or --last-published")
        }
        Topic::All | Topic::Severity => {}
        _ if filter != Filter::Empty => {
            bail!("date filters only apply to --all and --severity")
        }
        _ => {}
    }

    let format = match (args.cvrf, args.oval) {
        (false, true) => AdvisoryFormat::Oval,
        _ => AdvisoryFormat::Cvrf,
    };

    Ok(ResolvedQuery {
        topic,
        format,
        aspect,
        filter,
    })
}

fn output_format(name: &str) -> Result<OutputFormat> {
    match name {
        "table" => Ok(OutputFormat::Table),
        "json" => Ok(OutputFormat::Json),
        "csv" => Ok(OutputFormat::Csv),
        other => bail!("unknown output format '{}': use table, json or csv", other),
    }
}

pub async fn run(args: &QueryArgs) -> Result<()> {
    let query = resolve(args)?;
    let output = output_format(&args.output)?;
    let fields = select_fields(query.result_format(), &args.fields)?;

    let credentials = config::load_credentials(args.config.as_deref())?;
    let client = Client::connect(&credentials, &config::client_config(&args.user_agent))
        .await
        .context("failed to authenticate with the openVuln API")?;

    let advisories = client
        .get_by(
            query.topic.as_str(),
            query.format.as_str(),
            &query.aspect,
            &query.filter,
        )
        .await
        .with_context(|| format!("{} query for '{}' failed", query.topic, query.aspect))?;

    if args.count {
        println!("{}", advisories.len());
        return Ok(());
    }

    eprintln!("{} advisories found", advisories.len());
    print_advisories(&advisories, &fields, &output)
}
