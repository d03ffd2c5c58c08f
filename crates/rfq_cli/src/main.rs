// rfq: load → validate → normalize → select → compare → write artifacts / export.
//
// Without --rfq the dataset's RFQs are listed. With --rfq the offer pool is
// built and written to `offers.json`; with --select the offers are compared
// through a ComparisonSession and, with --render, exported from the preview.

mod args;

mod exitcodes {
    pub const OK: i32 = 0;
    /// Usage, malformed input, failed validation, bad parameters.
    pub const VALIDATION: i32 = 2;
    /// Selection limit, no quotes, nothing selected, unknown offer.
    pub const SELECTION: i32 = 3;
    pub const IO: i32 = 4;
}

use std::path::Path;
use std::process::ExitCode;

use args::{parse_and_validate as parse_cli, Args};
use rfq_core::{variables::validate_domains, OfferId, Params, Rfq, RfqId};
use rfq_io::{load_dataset, load_params, write_canonical_file, Dataset, IoError};
use rfq_pipeline::{
    build_pool_checked, pending_vendors, send_reminders, validate, ComparisonSession, ComparisonViewModel,
    LogReminderSender, NavError, OfferPool, PipelineError,
};
use rfq_report::{build_document, ComparisonDocument, ReportError};
use serde_json::json;

/// Central error type for CLI → exit-code mapping.
#[derive(Debug)]
enum MainError {
    Validation(String),
    Selection(String),
    Io(String),
}

impl MainError {
    fn message(&self) -> &str {
        match self {
            MainError::Validation(m) | MainError::Selection(m) | MainError::Io(m) => m,
        }
    }
}

fn main() -> ExitCode {
    let args = match parse_cli() {
        Ok(a) => a,
        Err(e) => {
            eprintln!("rfq: error: {e}");
            return ExitCode::from(exitcodes::VALIDATION as u8);
        }
    };
    setup_logging(args.quiet);

    let rc = match run(&args) {
        Ok(()) => exitcodes::OK,
        Err(e) => {
            eprintln!("rfq: error: {}", e.message());
            map_error(&e)
        }
    };
    ExitCode::from(rc as u8)
}

fn setup_logging(quiet: bool) {
    let level = if quiet { "warn" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn map_error(e: &MainError) -> i32 {
    use exitcodes::*;
    match e {
        MainError::Validation(_) => VALIDATION,
        MainError::Selection(_) => SELECTION,
        MainError::Io(_) => IO,
    }
}

fn run(args: &Args) -> Result<(), MainError> {
    let ds = load_dataset(&args.dataset).map_err(map_io_err)?;

    let Some(rfq_token) = &args.rfq else {
        list_rfqs(&ds);
        return Ok(());
    };
    let rfq_id: RfqId = rfq_token
        .parse()
        .map_err(|e| MainError::Validation(format!("--rfq {rfq_token}: {e}")))?;
    let rfq = ds
        .rfq(&rfq_id)
        .ok_or_else(|| MainError::Validation(format!("unknown RFQ {rfq_id}")))?;
    let submissions = ds.submissions_for(&rfq_id);

    if args.validate_only {
        return validate_only(rfq, &submissions[..]);
    }

    let params = resolve_params(args, &ds)?;
    let (pool, _report) = build_pool_checked(rfq, &submissions, &params).map_err(map_pipeline_err)?;
    write_offers(&args.out, &pool)?;

    if args.remind {
        let sent = send_reminders(&pool, &mut LogReminderSender);
        tracing::info!(sent, pending = pool.pending_vendors().len(), "reminders done");
    }

    if args.select.is_empty() {
        println!("{}: {} quoted, {} pending", rfq.id, pool.quoted_count(), pool.pending_vendors().len());
        return Ok(());
    }

    let mut session = ComparisonSession::new();
    let vm = compare_selection(&mut session, &pool, &args.select)?;
    print_summary(&vm, &params.currency);

    if !args.render.is_empty() {
        session.open_preview().map_err(map_nav_err)?;
        let vm = session.comparison(&pool).map_err(map_nav_err)?;
        let doc = build_document(rfq, &params.currency, &vm).map_err(map_report_err)?;
        for fmt in &args.render {
            export(fmt, &doc, args)?;
        }
        session.close_preview().map_err(map_nav_err)?;
    }
    Ok(())
}

fn list_rfqs(ds: &Dataset) {
    for r in &ds.rfqs {
        let subs = ds.submissions_for(&r.id);
        let quoted = subs.iter().filter(|s| s.has_quote()).count();
        let pending = pending_vendors(r, &subs).len();
        println!("{}\t{}\t{}\t{quoted} quoted, {pending} pending", r.id, r.status, r.title);
    }
}

fn validate_only(rfq: &Rfq, submissions: &[rfq_core::VendorSubmission]) -> Result<(), MainError> {
    let report = validate(rfq, submissions);
    let text = serde_json::to_string_pretty(&report).map_err(|e| MainError::Io(format!("report: {e}")))?;
    println!("{text}");
    if report.pass {
        Ok(())
    } else {
        Err(MainError::Validation(format!("{} validation error(s)", report.errors().count())))
    }
}

/// `--params` file, else the dataset's params, else defaults; then CLI overrides.
fn resolve_params(args: &Args, ds: &Dataset) -> Result<Params, MainError> {
    let mut p = match &args.params {
        Some(path) => load_params(path).map_err(map_io_err)?,
        None => ds.params.clone().unwrap_or_default(),
    };
    if let Some(split) = args.split {
        p.split_policy = split;
    }
    if let Some(seed) = args.seed {
        p.split_seed = Some(seed);
    }
    validate_domains(&p).map_err(|e| MainError::Validation(format!("params: {e}")))?;
    Ok(p)
}

fn write_offers(out_dir: &Path, pool: &OfferPool) -> Result<(), MainError> {
    let value = json!({
        "rfq_id": pool.rfq_id(),
        "offers": pool.offers(),
        "pending_vendors": pool.pending_vendors(),
    });
    let path = out_dir.join("offers.json");
    write_canonical_file(&path, &value).map_err(|e| MainError::Io(format!("write offers.json: {e}")))
}

/// Drive the session from the RFQ detail to the summary comparison.
fn compare_selection(
    session: &mut ComparisonSession,
    pool: &OfferPool,
    select: &[String],
) -> Result<ComparisonViewModel, MainError> {
    session.open_rfq(pool.rfq_id().clone()).map_err(map_nav_err)?;
    session.begin_selection(pool).map_err(map_nav_err)?;

    for token in select {
        let id: OfferId = token
            .trim()
            .parse()
            .map_err(|e| MainError::Validation(format!("--select {token}: {e}")))?;
        if session.selection().contains(&id) {
            tracing::warn!(offer = %id, "offer selected twice; ignored");
            continue;
        }
        session.toggle(pool, &id).map_err(map_nav_err)?;
    }

    session.compare(pool).map_err(map_nav_err)?;
    session.comparison(pool).map_err(map_nav_err)
}

fn print_summary(vm: &ComparisonViewModel, currency: &str) {
    for r in &vm.summary {
        println!(
            "{}{}\t{}\t{}\t{} {currency}",
            if r.is_best_offer { "*" } else { " " },
            r.offer_id,
            r.seller_name,
            r.status,
            r.grand_total
        );
    }
    if vm.best_offer.is_none() {
        println!("no full offer in the selection");
    }
}

fn export(fmt: &str, doc: &ComparisonDocument, args: &Args) -> Result<(), MainError> {
    match fmt {
        "json" => export_json(doc, &args.out),
        "html" => export_html(doc, &args.out, &args.lang),
        other => Err(MainError::Validation(format!("unknown renderer: {other}"))),
    }
}

fn export_json(doc: &ComparisonDocument, out_dir: &Path) -> Result<(), MainError> {
    #[cfg(feature = "report-json")]
    {
        use rfq_report::DocumentGenerator;
        rfq_report::JsonGenerator.generate(doc, out_dir).map_err(map_report_err)?;
        Ok(())
    }
    #[cfg(not(feature = "report-json"))]
    {
        let _ = (doc, out_dir);
        Err(MainError::Validation("json renderer not enabled (build with feature `report-json`)".into()))
    }
}

fn export_html(doc: &ComparisonDocument, out_dir: &Path, lang: &str) -> Result<(), MainError> {
    #[cfg(feature = "report-html")]
    {
        use rfq_report::DocumentGenerator;
        let generator = rfq_report::HtmlGenerator { lang: lang.to_string() };
        generator.generate(doc, out_dir).map_err(map_report_err)?;
        Ok(())
    }
    #[cfg(not(feature = "report-html"))]
    {
        let _ = (doc, out_dir, lang);
        Err(MainError::Validation("html renderer not enabled (build with feature `report-html`)".into()))
    }
}

fn map_io_err(e: IoError) -> MainError {
    match e {
        IoError::Json { .. } | IoError::Invalid(_) | IoError::Url(_) => MainError::Validation(e.to_string()),
        IoError::Path(_) | IoError::TooLarge { .. } => MainError::Io(e.to_string()),
    }
}

fn map_pipeline_err(e: PipelineError) -> MainError {
    MainError::Validation(e.to_string())
}

fn map_nav_err(e: NavError) -> MainError {
    match e {
        NavError::Selection(s) => MainError::Selection(s.to_string()),
        other => MainError::Validation(other.to_string()),
    }
}

fn map_report_err(e: ReportError) -> MainError {
    match e {
        ReportError::EmptyComparison => MainError::Selection(e.to_string()),
        ReportError::Io(io) => MainError::Io(io.to_string()),
        ReportError::Serialize(s) => MainError::Io(format!("serialize: {s}")),
    }
}
