//! Pipeline job handling against the in-memory backend.

use std::io::{Cursor, Write};

use scsync_core::AccountId;
use scsync_engine::config::CatalogSettings;
use scsync_engine::{CatalogSync, JobRunner, JobStatus, SyncError};
use scsync_memory::{CatalogCall, MemoryBackend};
use serde_json::{Value, json};
use zip::write::{SimpleFileOptions, ZipWriter};
use zip::CompressionMethod;

const MANIFEST: &str = "name: Networking\nowner: platform@example.com\nproducts:\n  - name: vpc\n    owner: platform@example.com\n    template: vpc.yaml\n";

fn artifact(entries: &[(&str, &str)]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
    for (name, body) in entries {
        writer.start_file(*name, options).unwrap();
        writer.write_all(body.as_bytes()).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

fn event(user_parameters: Option<&str>) -> Value {
    let mut event = json!({
        "CodePipeline.job": {
            "id": "job-42",
            "data": {
                "inputArtifacts": [{
                    "location": {
                        "s3Location": {"bucketName": "artifacts", "objectKey": "run/source.zip"}
                    }
                }]
            }
        }
    });
    if let Some(p) = user_parameters {
        event["CodePipeline.job"]["data"]["actionConfiguration"] =
            json!({"configuration": {"UserParameters": p}});
    }
    event
}

fn runner(backend: &MemoryBackend) -> JobRunner {
    let sync = CatalogSync::new(
        backend.catalog.clone(),
        backend.objects.clone(),
        backend.identity.clone(),
        CatalogSettings::default(),
    );
    JobRunner::new(sync, backend.objects.clone(), backend.jobs.clone())
}

fn backend() -> MemoryBackend {
    MemoryBackend::new(AccountId::parse("999999999999").unwrap())
}

#[tokio::test]
async fn successful_job_is_reported() {
    let backend = backend();
    let bytes = artifact(&[
        ("packages/acme/networking-mapping.yaml", MANIFEST),
        ("packages/acme/vpc.yaml", "Resources: {}\n"),
    ]);
    backend.objects.insert_object("artifacts", "run/source.zip", bytes).await;

    let status = runner(&backend).handle(&event(None)).await.unwrap();

    let JobStatus::Succeeded(report) = status else {
        panic!("expected success, got {status:?}");
    };
    assert_eq!(report.products_created(), 1);
    let outcomes = backend.jobs.outcomes().await;
    assert_eq!(outcomes.len(), 1);
    assert!(outcomes[0].success);
    assert_eq!(outcomes[0].message, "Success");
    // Templates land in the artifact bucket by default.
    assert_eq!(backend.objects.keys("artifacts").await.len(), 2);
}

#[tokio::test]
async fn user_parameters_choose_template_bucket() {
    let backend = backend();
    let bytes = artifact(&[
        ("packages/acme/networking-mapping.yaml", MANIFEST),
        ("packages/acme/vpc.yaml", "Resources: {}\n"),
    ]);
    backend.objects.insert_object("artifacts", "run/source.zip", bytes).await;

    runner(&backend)
        .handle(&event(Some(r#"{"templateBucket": "templates"}"#)))
        .await
        .unwrap();

    assert_eq!(backend.objects.keys("templates").await.len(), 1);
}

#[tokio::test]
async fn decode_failure_is_reported_before_mutation() {
    let backend = backend();

    let status = runner(&backend)
        .handle(&event(Some("{broken")))
        .await
        .unwrap();

    let JobStatus::Failed(message) = status else {
        panic!("expected failure");
    };
    assert!(message.starts_with("Function exception: "));
    let outcomes = backend.jobs.outcomes().await;
    assert_eq!(outcomes[0].job_id, "job-42");
    assert!(!outcomes[0].success);
    assert!(backend.catalog.journal().await.is_empty());
}

#[tokio::test]
async fn missing_artifact_fails_the_job() {
    let backend = backend();

    let status = runner(&backend).handle(&event(None)).await.unwrap();

    assert!(matches!(status, JobStatus::Failed(ref m) if m.contains("not found")));
    assert!(!backend.jobs.outcomes().await[0].success);
}

#[tokio::test]
async fn missing_packages_fails_the_job() {
    let backend = backend();
    let bytes = artifact(&[("README.md", "nothing here")]);
    backend.objects.insert_object("artifacts", "run/source.zip", bytes).await;

    let status = runner(&backend).handle(&event(None)).await.unwrap();

    assert!(matches!(status, JobStatus::Failed(ref m) if m.contains("packages")));
    assert!(
        backend
            .catalog
            .journal()
            .await
            .iter()
            .all(|c| !matches!(c, CatalogCall::CreatePortfolio { .. }))
    );
}

#[tokio::test]
async fn event_without_job_id_is_not_reported() {
    let backend = backend();

    let err = runner(&backend).handle(&json!({"unexpected": true})).await.unwrap_err();

    assert!(matches!(err, SyncError::JobDecode(_)));
    assert!(backend.jobs.outcomes().await.is_empty());
}
