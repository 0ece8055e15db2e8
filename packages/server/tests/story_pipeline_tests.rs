//! End-to-end tests for the story generation pipeline, driven through the
//! service layer with a scripted generator.

use std::sync::Arc;
use std::time::Duration;

use server_core::domains::stories::{
    assemble_artifact, start_story, story_status, StageContext, StageDefinition,
    StartStoryRequest, StoryError,
};
use server_core::kernel::jobs::{JobRecord, JobStatus};
use server_core::kernel::{ScriptedGenerator, ServerDeps};
use uuid::Uuid;

fn stages(ids: &[&str]) -> Vec<StageDefinition> {
    ids.iter()
        .map(|id| StageDefinition::new(*id, format!("Stage {}", id), 5))
        .collect()
}

fn deps_with(generator: Arc<ScriptedGenerator>, stage_ids: &[&str]) -> ServerDeps {
    ServerDeps::with_defaults(generator)
        .with_stages(stages(stage_ids))
        .with_input_bounds(1, 10_000)
}

fn request(input: &str) -> StartStoryRequest {
    StartStoryRequest {
        input: input.to_string(),
    }
}

async fn poll_until_terminal(deps: &ServerDeps, id: Uuid) -> JobRecord {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    loop {
        let record = story_status(deps, id).await.unwrap();
        if record.status.is_terminal() {
            return record;
        }
        assert!(
            tokio::time::Instant::now() < deadline,
            "job did not reach a terminal state in time"
        );
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
}

#[tokio::test]
async fn three_stage_success_assembles_sections_in_order() {
    let generator = Arc::new(
        ScriptedGenerator::new()
            .with_output("one", "A")
            .with_output("two", "B")
            .with_output("three", "C"),
    );
    let deps = deps_with(generator, &["one", "two", "three"]);

    let job_id = start_story(&deps, request("the story of a long life"))
        .await
        .unwrap();
    let record = poll_until_terminal(&deps, job_id).await;

    assert_eq!(record.status, JobStatus::Complete);
    let artifact = record.result.unwrap();
    let a = artifact.find("A").unwrap();
    let b = artifact.find("B").unwrap();
    let c = artifact.find("C").unwrap();
    assert!(a < b && b < c);
    assert!(record.error.is_none());
}

#[tokio::test]
async fn failing_stage_names_itself_and_halts_the_pipeline() {
    let generator = Arc::new(
        ScriptedGenerator::new()
            .with_output("one", "A")
            .with_failure("two", "backend exploded"),
    );
    let deps = deps_with(generator.clone(), &["one", "two", "three"]);

    let job_id = start_story(&deps, request("the story of a long life"))
        .await
        .unwrap();
    let record = poll_until_terminal(&deps, job_id).await;

    assert_eq!(record.status, JobStatus::Failed);
    assert!(record.error.unwrap().contains("two"));
    assert!(record.result.is_none());
    // Stage three never ran.
    assert_eq!(generator.calls(), 2);
}

#[tokio::test]
async fn empty_input_is_rejected_and_creates_no_job() {
    let generator = Arc::new(ScriptedGenerator::new());
    let deps = deps_with(generator, &["one"]);

    let err = start_story(&deps, request("")).await.unwrap_err();
    assert!(matches!(err, StoryError::Validation(_)));

    // No job exists for any fresh id.
    let probe = Uuid::new_v4();
    let status_err = story_status(&deps, probe).await.unwrap_err();
    assert!(matches!(status_err, StoryError::NotFound(id) if id == probe));
}

#[tokio::test]
async fn input_length_bounds_are_inclusive() {
    let generator = Arc::new(ScriptedGenerator::new());
    let deps = deps_with(generator, &["one"]).with_input_bounds(1, 50);

    let at_max = "x".repeat(50);
    let over_max = "x".repeat(51);

    assert!(start_story(&deps, request(&at_max)).await.is_ok());
    assert!(matches!(
        start_story(&deps, request(&over_max)).await.unwrap_err(),
        StoryError::Validation(_)
    ));
}

#[tokio::test]
async fn concurrent_jobs_get_distinct_ids_and_independent_records() {
    let generator = Arc::new(
        ScriptedGenerator::new().with_delay(Duration::from_millis(20)),
    );
    let deps = deps_with(generator, &["one", "two"]);

    let first = start_story(&deps, request("the first client's story"))
        .await
        .unwrap();
    let second = start_story(&deps, request("the second client's story"))
        .await
        .unwrap();

    assert_ne!(first, second);

    let first_record = poll_until_terminal(&deps, first).await;
    let second_record = poll_until_terminal(&deps, second).await;

    assert_eq!(first_record.id, first);
    assert_eq!(second_record.id, second);
    assert_eq!(first_record.status, JobStatus::Complete);
    assert_eq!(second_record.status, JobStatus::Complete);
}

#[tokio::test]
async fn zero_stage_pipeline_completes_before_start_returns() {
    let generator = Arc::new(ScriptedGenerator::new());
    let deps = deps_with(generator, &[]);

    let input = "a request for an empty pipeline";
    let job_id = start_story(&deps, request(input)).await.unwrap();

    // No polling: the record is already terminal.
    let record = story_status(&deps, job_id).await.unwrap();
    assert_eq!(record.status, JobStatus::Complete);

    let expected = assemble_artifact(&StageContext::new(input).summary, &[]);
    assert_eq!(record.result.unwrap(), expected);
}

#[tokio::test]
async fn polled_progress_is_monotonic_and_bounded() {
    let generator = Arc::new(
        ScriptedGenerator::new().with_delay(Duration::from_millis(15)),
    );
    let deps = deps_with(generator, &["one", "two", "three"]);

    let job_id = start_story(&deps, request("a story to watch progress on"))
        .await
        .unwrap();

    let mut observed = Vec::new();
    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    loop {
        let record = story_status(&deps, job_id).await.unwrap();
        observed.push(record.progress.current_step_index);
        if record.status.is_terminal() {
            break;
        }
        assert!(tokio::time::Instant::now() < deadline);
        tokio::time::sleep(Duration::from_millis(2)).await;
    }

    for pair in observed.windows(2) {
        assert!(pair[0] <= pair[1], "progress went backwards: {:?}", observed);
    }
    assert!(observed.iter().all(|&index| index <= 3));
}

#[tokio::test]
async fn terminal_records_never_change() {
    let generator = Arc::new(ScriptedGenerator::new().with_output("one", "stable text"));
    let deps = deps_with(generator, &["one"]);

    let job_id = start_story(&deps, request("a story that completes"))
        .await
        .unwrap();
    let first = poll_until_terminal(&deps, job_id).await;

    tokio::time::sleep(Duration::from_millis(20)).await;
    let second = story_status(&deps, job_id).await.unwrap();

    assert_eq!(first.status, second.status);
    assert_eq!(first.result, second.result);
    assert_eq!(first.error, second.error);
    assert_eq!(first.progress, second.progress);
}

#[tokio::test]
async fn empty_generator_output_fails_the_job() {
    let generator = Arc::new(ScriptedGenerator::new().with_output("one", "  \n "));
    let deps = deps_with(generator, &["one", "two"]);

    let job_id = start_story(&deps, request("a story that goes blank"))
        .await
        .unwrap();
    let record = poll_until_terminal(&deps, job_id).await;

    assert_eq!(record.status, JobStatus::Failed);
    assert!(record.error.unwrap().contains("empty output"));
}

#[tokio::test]
async fn status_of_unknown_id_is_not_found() {
    let generator = Arc::new(ScriptedGenerator::new());
    let deps = deps_with(generator, &["one"]);

    let err = story_status(&deps, Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, StoryError::NotFound(_)));
}
