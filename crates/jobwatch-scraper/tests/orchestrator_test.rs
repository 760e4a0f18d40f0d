use jobwatch_browser::testing::{FixtureLauncher, FixtureSite};
use jobwatch_core::{Country, PLACEHOLDER};
use jobwatch_scheduler::{CountryScraper, Scheduler};
use jobwatch_scraper::{ScrapeOrchestrator, ScrapeSettings};
use jobwatch_store::JobStore;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

const NORWAY_SEARCH: &str = "https://www.linkedin.com/jobs/search/?location=Norway";
const NORWAY_FILTERED: &str = "https://www.linkedin.com/jobs/search/?location=Norway&f_TPR=r86400";
const ICELAND_SEARCH: &str = "https://www.linkedin.com/jobs/search/?location=Iceland";

const JOB_1: &str = "https://www.linkedin.com/jobs/view/site-reliability-engineer-1";
const JOB_2: &str = "https://www.linkedin.com/jobs/view/data-engineer-2";
const JOB_3: &str = "https://www.linkedin.com/jobs/view/nurse-3";

const FILTER_CONTROLS: &str = r#"
    <button class="modal__dismiss">Dismiss</button>
    <button class="filter-button">Date posted</button>
    <label for="f_TPR-3">Past 24 hours</label>
    <button class="filter__submit-button">Show results</button>
"#;

fn card(href: &str, title: &str) -> String {
    format!(
        r#"<li><div class="base-card"><a class="base-card__full-link" href="{href}"><span class="sr-only">{title}</span></a></div></li>"#
    )
}

fn search_page(controls: &str, cards: &[String]) -> String {
    format!(
        "<html><body>{controls}<ul class=\"jobs-search__results-list\">{}</ul></body></html>",
        cards.concat()
    )
}

fn job_page(title: &str, company: &str) -> String {
    format!(
        r#"<html><body>
            <h1 class="top-card-layout__title">{title}</h1>
            <a class="topcard__org-name-link">{company}</a>
            <div class="topcard__flavor-row">{company} Oslo, Oslo, Norway</div>
            <span class="topcard__flavor--bullet">Oslo, Oslo, Norway</span>
            <div class="show-more-less-html__markup">Keep things running.</div>
            <span class="posted-time-ago__text">5 hours ago</span>
            <ul class="description__job-criteria-list">
                <li><h3 class="description__job-criteria-subheader">Job function</h3>
                    <span class="description__job-criteria-text">Information Technology</span></li>
            </ul>
        </body></html>"#
    )
}

struct Harness {
    _tmp: TempDir,
    site: Arc<FixtureSite>,
    orchestrator: ScrapeOrchestrator,
}

fn harness(site: FixtureSite) -> Harness {
    harness_with(site, ScrapeSettings::default())
}

fn harness_with(site: FixtureSite, settings: ScrapeSettings) -> Harness {
    let tmp = TempDir::new().expect("create temp dir");
    let store = JobStore::open(tmp.path().join("jobs.json")).expect("open store");
    let site = Arc::new(site);
    let launcher = Arc::new(FixtureLauncher::new(Arc::clone(&site)));
    let orchestrator = ScrapeOrchestrator::new(launcher, settings, store);

    Harness {
        _tmp: tmp,
        site,
        orchestrator,
    }
}

fn norway() -> Country {
    Country::new("Norway").expect("valid country")
}

fn iceland() -> Country {
    Country::new("Iceland").expect("valid country")
}

#[tokio::test]
async fn test_filtered_jobs_are_saved() {
    let site = FixtureSite::new()
        .page(
            NORWAY_SEARCH,
            search_page(FILTER_CONTROLS, &[card(JOB_3, "Nurse")]),
        )
        .page(
            NORWAY_FILTERED,
            search_page(
                "",
                &[
                    card(
                        "https://no.linkedin.com/jobs/view/site-reliability-engineer-1",
                        "Site Reliability Engineer",
                    ),
                    card(JOB_2, "Data Engineer"),
                ],
            ),
        )
        .on_click(NORWAY_SEARCH, "button.filter__submit-button", NORWAY_FILTERED)
        .page(JOB_1, job_page("Site Reliability Engineer", "Fjord Systems"))
        .page(JOB_2, job_page("Data Engineer", "Polar Data"));
    let h = harness(site);

    let result = h.orchestrator.scrape_country(&norway()).await;

    assert!(result.succeeded());
    assert_eq!(result.attempts, 1);
    assert_eq!(result.jobs_found, 2);
    assert_eq!(result.jobs_saved, 2);

    let store = h.orchestrator.store().await;
    let records = store.records();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].title, "Site Reliability Engineer");
    assert_eq!(records[0].link, JOB_1);
    assert_eq!(records[0].location, "Oslo");
    assert_eq!(records[0].job_category, "Information Technology");
    assert_eq!(records[1].company, "Polar Data");
    assert!(records.iter().all(|r| r.country == "Norway"));

    // one search session plus one per job, all closed
    assert_eq!(h.site.launches(), 3);
    assert_eq!(h.site.closes(), 3);
}

#[tokio::test]
async fn test_filter_failure_falls_back_to_unfiltered_listing() {
    let site = FixtureSite::new()
        .page(
            NORWAY_SEARCH,
            search_page("", &[card(JOB_1, "Site Reliability Engineer")]),
        )
        .page(JOB_1, job_page("Site Reliability Engineer", "Fjord Systems"));
    let h = harness(site);

    let result = h.orchestrator.scrape_country(&norway()).await;

    assert!(result.succeeded());
    assert_eq!(result.jobs_saved, 1);
    assert_eq!(h.site.visits(), vec![NORWAY_SEARCH, NORWAY_SEARCH, JOB_1]);
}

#[tokio::test]
async fn test_empty_filtered_listing_falls_back() {
    let site = FixtureSite::new()
        .page(
            NORWAY_SEARCH,
            search_page(FILTER_CONTROLS, &[card(JOB_2, "Data Engineer")]),
        )
        .page(NORWAY_FILTERED, search_page("", &[]))
        .on_click(NORWAY_SEARCH, "button.filter__submit-button", NORWAY_FILTERED)
        .page(JOB_2, job_page("Data Engineer", "Polar Data"));
    let h = harness(site);

    let result = h.orchestrator.scrape_country(&norway()).await;

    assert!(result.succeeded());
    assert_eq!(result.jobs_saved, 1);
    assert_eq!(h.orchestrator.store().await.records()[0].link, JOB_2);
}

#[tokio::test]
async fn test_missing_fields_are_saved_as_placeholders() {
    let site = FixtureSite::new()
        .page(
            NORWAY_SEARCH,
            search_page("", &[card(JOB_3, "Nurse")]),
        )
        .page(
            JOB_3,
            r#"<html><body><h2 class="topcard__title">Nurse</h2></body></html>"#,
        );
    let h = harness(site);

    h.orchestrator.scrape_country(&norway()).await;

    let store = h.orchestrator.into_store();
    let contents = std::fs::read_to_string(store.path()).expect("read jobs file");
    let array: Vec<serde_json::Value> = serde_json::from_str(&contents).expect("JSON array");

    assert_eq!(array.len(), 1);
    let job = array[0].as_object().expect("record object");
    for key in [
        "title",
        "company",
        "companyDescription",
        "location",
        "jobDescription",
        "link",
        "country",
        "postedTime",
        "jobCategory",
    ] {
        assert!(job.contains_key(key), "missing key {key}");
    }
    assert_eq!(job["title"], "Nurse");
    assert_eq!(job["company"], PLACEHOLDER);
    assert_eq!(job["jobDescription"], PLACEHOLDER);
    assert_eq!(job["jobCategory"], PLACEHOLDER);
}

#[tokio::test]
async fn test_failed_job_is_skipped() {
    // JOB_2 has no page, so its detail session fails
    let site = FixtureSite::new()
        .page(
            NORWAY_SEARCH,
            search_page(
                "",
                &[card(JOB_2, "Data Engineer"), card(JOB_3, "Nurse")],
            ),
        )
        .page(JOB_3, job_page("Nurse", "Oslo University Hospital"));
    let h = harness(site);

    let result = h.orchestrator.scrape_country(&norway()).await;

    assert!(result.succeeded());
    assert_eq!(result.jobs_found, 2);
    assert_eq!(result.jobs_saved, 1);
    assert_eq!(h.site.launches(), h.site.closes());
}

#[tokio::test]
async fn test_retries_exhausted_then_next_country_runs() {
    let site = FixtureSite::new()
        .page(NORWAY_SEARCH, search_page("", &[card(JOB_1, "Never read")]))
        .broken(NORWAY_SEARCH)
        .page(ICELAND_SEARCH, search_page("", &[card(JOB_3, "Nurse")]))
        .page(JOB_3, job_page("Nurse", "Landspitali"));
    let h = harness(site);

    let failed = h.orchestrator.scrape_country(&norway()).await;
    assert!(!failed.succeeded());
    assert_eq!(failed.attempts, 3);
    assert_eq!(failed.jobs_saved, 0);
    assert!(failed
        .error
        .as_deref()
        .is_some_and(|e| e.contains("after 3 attempts")));
    assert_eq!(h.site.launches(), 3);
    assert_eq!(h.site.closes(), 3);

    let scheduler = Scheduler::new(vec![norway(), iceland()], Duration::ZERO)
        .expect("countries")
        .with_max_cycles(Some(1));
    let summary = scheduler.run(&h.orchestrator, &CancellationToken::new()).await;

    assert_eq!(summary.cycles_completed, 1);
    assert_eq!(summary.countries_attempted, 2);
    assert_eq!(summary.countries_failed, 1);
    assert_eq!(summary.jobs_saved, 1);
    assert_eq!(h.orchestrator.store().await.records()[0].country, "Iceland");
}

#[tokio::test]
async fn test_launch_failures_count_as_attempts() {
    let site = FixtureSite::new()
        .fail_launches(2)
        .page(NORWAY_SEARCH, search_page("", &[card(JOB_1, "SRE")]))
        .page(JOB_1, job_page("Site Reliability Engineer", "Fjord Systems"));
    let h = harness(site);

    let result = h.orchestrator.scrape_country(&norway()).await;

    assert!(result.succeeded());
    assert_eq!(result.attempts, 3);
    assert_eq!(result.jobs_saved, 1);
}

#[tokio::test]
async fn test_profile_dir_is_cleared_before_country() {
    let tmp = TempDir::new().expect("create temp dir");
    let profile = tmp.path().join("chrome-profile");
    std::fs::create_dir_all(profile.join("Default")).expect("create profile");
    std::fs::write(profile.join("Default/Cookies"), b"session").expect("write cookies");

    let settings = ScrapeSettings {
        profile_dir: Some(profile.clone()),
        ..ScrapeSettings::default()
    };
    let site = FixtureSite::new().page(NORWAY_SEARCH, search_page("", &[]));
    let h = harness_with(site, settings);

    let result = h.orchestrator.scrape_country(&norway()).await;

    assert!(result.succeeded());
    assert_eq!(result.jobs_found, 0);
    assert!(!profile.exists());
}

#[tokio::test]
async fn test_search_session_closed_before_job_sessions() {
    let site = FixtureSite::new()
        .page(
            NORWAY_SEARCH,
            search_page("", &[card(JOB_1, "SRE"), card(JOB_2, "Data Engineer")]),
        )
        .page(JOB_1, job_page("Site Reliability Engineer", "Fjord Systems"))
        .page(JOB_2, job_page("Data Engineer", "Polar Data"));
    let h = harness(site);

    let result = h.orchestrator.scrape_country(&norway()).await;

    assert_eq!(result.jobs_saved, 2);
    assert_eq!(h.site.launches(), 3);
    assert_eq!(h.site.max_open_sessions(), 1);
}

#[tokio::test]
async fn test_store_write_failure_skips_job() {
    let tmp = TempDir::new().expect("create temp dir");
    let path = tmp.path().join("jobs.json");
    let store = JobStore::open(&path).expect("open store");
    // A directory where the file should be makes every write fail
    std::fs::create_dir_all(path.join("occupied")).expect("create blocking dir");

    let site = Arc::new(
        FixtureSite::new()
            .page(
                NORWAY_SEARCH,
                search_page("", &[card(JOB_1, "SRE"), card(JOB_2, "Data Engineer")]),
            )
            .page(JOB_1, job_page("Site Reliability Engineer", "Fjord Systems"))
            .page(JOB_2, job_page("Data Engineer", "Polar Data")),
    );
    let launcher = Arc::new(FixtureLauncher::new(Arc::clone(&site)));
    let orchestrator = ScrapeOrchestrator::new(launcher, ScrapeSettings::default(), store);

    let result = orchestrator.scrape_country(&norway()).await;

    assert!(result.succeeded());
    assert_eq!(result.attempts, 1);
    assert_eq!(result.jobs_found, 2);
    assert_eq!(result.jobs_saved, 0);
    assert!(orchestrator.store().await.is_empty());

    // the second job is still fetched after the first write fails
    let visits = site.visits();
    assert!(visits.iter().any(|v| v == JOB_1));
    assert!(visits.iter().any(|v| v == JOB_2));
}

#[tokio::test]
async fn test_unreadable_filtered_listing_falls_back_without_retry() {
    let site = FixtureSite::new()
        .page(
            NORWAY_SEARCH,
            search_page(FILTER_CONTROLS, &[card(JOB_2, "Data Engineer")]),
        )
        .page(NORWAY_FILTERED, search_page("", &[card(JOB_1, "SRE")]))
        .on_click(NORWAY_SEARCH, "button.filter__submit-button", NORWAY_FILTERED)
        .fail_content(1)
        .page(JOB_2, job_page("Data Engineer", "Polar Data"));
    let h = harness(site);

    let result = h.orchestrator.scrape_country(&norway()).await;

    assert!(result.succeeded());
    assert_eq!(result.attempts, 1);
    assert_eq!(h.orchestrator.store().await.records()[0].link, JOB_2);
}
