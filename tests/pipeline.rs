//! Whole runs against a local stand-in for the GOrilla service.

use std::fs;

use gorilla_scrape::config::{RunConfig, RunSource};
use gorilla_scrape::process::process_run;
use gorilla_scrape::results::GeneList;
use gorilla_scrape::Error;
use tempfile::TempDir;
use wiremock::{
    matchers::{body_string_contains, method, path},
    Mock, MockServer, Request, ResponseTemplate,
};

const RUN_ID: &str = "abc123";

const SELECT_DB: &str = r#"<select name="db">
                <option value="proc">Process</option>
                <option value="all">All</option>
            </select>"#;

const RADIO_DB: &str = r#"<input type="radio" name="db" value="proc" checked> Process
            <input type="radio" name="db" value="func"> Function
            <input type="radio" name="db" value="all"> All"#;

fn landing_page(enctype: &str, db_field: &str) -> String {
    format!(
        r#"<html><head><title>GOrilla</title></head><body>
        <form method="post" action="/servlet/GOrilla" {enctype}>
            <input type="radio" name="run_mode" value="mhg" checked>
            <select name="species"><option value="HOMO_SAPIENS" selected>Homo sapiens</option></select>
            <textarea name="target_set"></textarea>
            <input type="file" name="target_file">
            {db_field}
            <input type="submit" name="run_gogo_button" value="Search Enriched GO terms">
        </form></body></html>"#
    )
}

fn results_page(rows: &[(&str, &str, &str)]) -> String {
    let rows: String = rows
        .iter()
        .map(|(term, counts, genes)| {
            format!(
                "<tr><td>{term}</td><td>term {term}</td><td>1E-4</td><td>2E-2</td>\
                 <td>3.1 ({counts})</td><td>[+] Show genes\n{genes}</td></tr>"
            )
        })
        .collect();
    format!(
        "<html><head><title>GOrilla Results</title></head><body>\
         <table><tr><td>header</td></tr></table>\
         <table><tr><th>GO term</th><th>Description</th><th>P-value</th>\
         <th>FDR q-value</th><th>Enrichment</th><th>Genes</th></tr>{rows}</table>\
         </body></html>"
    )
}

const NO_ENRICHMENT: &str =
    "<html><head><title>No GO Enrichment Found</title></head><body></body></html>";

async fn mount_page(server: &MockServer, page: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(format!("/GOrilla/{RUN_ID}/{page}")))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/html"))
        .mount(server)
        .await;
}

async fn mount_results(server: &MockServer) {
    mount_page(
        server,
        "GOResultsPROCESS.html",
        results_page(&[
            ("GO:0006281", "200,40,2,2", "TP53 - tumor protein p53\nBRCA1 - BRCA1 DNA repair"),
            ("GO:0006974", "200,60,2,1", "TP53 - tumor protein p53"),
        ]),
    )
    .await;
    mount_page(server, "GOResultsFUNCTION.html", NO_ENRICHMENT.into()).await;
    mount_page(
        server,
        "GOResultsCOMPONENT.html",
        results_page(&[("GO:0005634", "180,90,2,2", "TP53 - p53\nBRCA1 - repair")]),
    )
    .await;
}

async fn mount_submission(server: &MockServer, enctype: &str, db_field: &str, body_checks: &[&str]) {
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(landing_page(enctype, db_field), "text/html"),
        )
        .mount(server)
        .await;
    let mut submission = Mock::given(method("POST"))
        .and(path("/servlet/GOrilla"))
        .and(|req: &Request| !String::from_utf8_lossy(&req.body).contains("db=proc"));
    for check in body_checks {
        submission = submission.and(body_string_contains(*check));
    }
    submission
        .respond_with(
            ResponseTemplate::new(302)
                .insert_header("Location", format!("/GOrilla/{RUN_ID}/GOResults.html").as_str()),
        )
        .expect(1)
        .mount(server)
        .await;
    mount_page(server, "GOResults.html", "<html><body>running</body></html>".into()).await;
}

fn config(server: &MockServer, out: &TempDir, source: RunSource) -> RunConfig {
    RunConfig {
        service_url: server.uri(),
        out_dir: out.path().join("enrichment"),
        source,
    }
}

fn genes() -> RunSource {
    RunSource::Genes(["TP53", "BRCA1"].into_iter().collect::<GeneList>())
}

#[tokio::test]
async fn fresh_submission_writes_all_three_tables() {
    let server = MockServer::start().await;
    mount_submission(&server, "", SELECT_DB, &["target_set=TP53%0ABRCA1", "db=all"]).await;
    mount_results(&server).await;

    let out = TempDir::new().unwrap();
    let config = config(&server, &out, genes());
    process_run(&config).await.unwrap();

    let process = fs::read_to_string(config.out_dir.join("process.tsv")).unwrap();
    let lines: Vec<_> = process.lines().collect();
    assert_eq!(
        lines[0],
        format!("# URL: {}/GOrilla/{RUN_ID}/GOResultsPROCESS.html", server.uri())
    );
    assert_eq!(lines[1], "# Total genes: 200");
    assert_eq!(lines[2], "term\tdesc\tpval\tfdr\tenrichment\tB\tn\tb\tgenes");
    assert_eq!(
        lines[3],
        "GO:0006281\tterm GO:0006281\t1E-4\t2E-2\t3.1\t40\t2\t2\tTP53,BRCA1"
    );
    assert_eq!(lines[4], "GO:0006974\tterm GO:0006974\t1E-4\t2E-2\t3.1\t60\t2\t1\tTP53");
    assert_eq!(lines.len(), 5);

    let function = fs::read_to_string(config.out_dir.join("function.tsv")).unwrap();
    assert!(function.contains("# Total genes: 0\n"));
    assert_eq!(function.lines().count(), 3);

    let component = fs::read_to_string(config.out_dir.join("component.tsv")).unwrap();
    assert!(component.contains("# Total genes: 180\n"));
    assert_eq!(component.lines().count(), 4);
}

#[tokio::test]
async fn multipart_form_is_submitted_as_multipart() {
    let server = MockServer::start().await;
    mount_submission(
        &server,
        r#"enctype="multipart/form-data""#,
        SELECT_DB,
        &["TP53\nBRCA1", r#"name="target_file"; filename="""#],
    )
    .await;
    mount_results(&server).await;

    let out = TempDir::new().unwrap();
    let config = config(&server, &out, genes());
    process_run(&config).await.unwrap();

    assert!(config.out_dir.join("component.tsv").is_file());
}

#[tokio::test]
async fn radio_db_group_is_switched_to_all() {
    let server = MockServer::start().await;
    mount_submission(&server, "", RADIO_DB, &["target_set=TP53%0ABRCA1", "db=all"]).await;
    mount_results(&server).await;

    let out = TempDir::new().unwrap();
    let config = config(&server, &out, genes());
    process_run(&config).await.unwrap();

    assert!(config.out_dir.join("process.tsv").is_file());
}

#[tokio::test]
async fn known_run_id_skips_submission() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;
    mount_results(&server).await;

    let out = TempDir::new().unwrap();
    let config = config(&server, &out, RunSource::RunId(RUN_ID.into()));
    process_run(&config).await.unwrap();

    for name in ["process.tsv", "function.tsv", "component.tsv"] {
        assert!(config.out_dir.join(name).is_file(), "{name} missing");
    }
}

#[tokio::test]
async fn broken_page_keeps_earlier_tables() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "GOResultsPROCESS.html",
        results_page(&[("GO:0006281", "200,40,2,2", "TP53 - p53")]),
    )
    .await;
    mount_page(&server, "GOResultsFUNCTION.html", NO_ENRICHMENT.into()).await;
    mount_page(
        &server,
        "GOResultsCOMPONENT.html",
        "<html><head><title>GOrilla</title></head><body><p>moved</p></body></html>".into(),
    )
    .await;

    let out = TempDir::new().unwrap();
    let config = config(&server, &out, RunSource::RunId(RUN_ID.into()));
    let res = process_run(&config).await;

    assert!(matches!(res, Err(Error::Parse(_))));
    assert!(config.out_dir.join("process.tsv").is_file());
    assert!(config.out_dir.join("function.tsv").is_file());
    assert!(!config.out_dir.join("component.tsv").exists());
}

#[tokio::test]
async fn landing_page_without_gene_field_aborts_before_output() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            r#"<html><body><form action="/x"><input name="q"></form></body></html>"#,
            "text/html",
        ))
        .mount(&server)
        .await;

    let out = TempDir::new().unwrap();
    let config = config(&server, &out, genes());
    let res = process_run(&config).await;

    assert!(matches!(res, Err(Error::FormLayout(_))));
    assert_eq!(fs::read_dir(&config.out_dir).unwrap().count(), 0);
}

#[tokio::test]
async fn missing_results_page_is_network_error() {
    let server = MockServer::start().await;

    let out = TempDir::new().unwrap();
    let config = config(&server, &out, RunSource::RunId(RUN_ID.into()));
    let res = process_run(&config).await;

    assert!(matches!(res, Err(Error::Reqwest(_))));
}
