use std::path::PathBuf;

use consulting_evaluator::auth::{authenticate, Session};
use consulting_evaluator::config::Config;
use consulting_evaluator::db::{MemoryStore, Store};
use consulting_evaluator::export::{ExportFormat, ExportRow, Exporter};
use consulting_evaluator::form::{submit, FormIntent, Mutation, ProjectInput};
use consulting_evaluator::models::{Assignment, ConsultantRate, Project};
use consulting_evaluator::workspace::{EvaluatedProject, Workspace};
use consulting_evaluator::EvaluatorError;

fn session() -> Session {
    let config = Config {
        database_url: None,
        export_dir: PathBuf::from("exports"),
        log_file: PathBuf::from("test.log"),
        app_username: Some("planner".to_string()),
        app_password: Some("secret".to_string()),
    };
    authenticate(&config, "planner", "secret").unwrap()
}

async fn seeded_store() -> MemoryStore {
    let store = MemoryStore::new();
    store.seed_default_rates().await.unwrap();
    store
}

#[tokio::test]
async fn saved_project_is_evaluated_from_live_rates() {
    let store = seeded_store().await;
    let session = session();
    let workspace = Workspace::new(&store, &session);

    let mut input = ProjectInput::blank(&workspace.list_rates().await.unwrap());
    input.name = "Market entry".to_string();
    input.assignment.set("Strategy Consultant", 2);

    let outcome = submit(&input, &workspace.rate_table().await.unwrap(), FormIntent::Save).unwrap();
    let mutation = outcome.mutation.expect("save yields a mutation");
    assert!(matches!(mutation, Mutation::Create(_)));
    let id = workspace.apply(&mutation).await.unwrap();

    let evaluated = workspace.evaluated_projects().await.unwrap();
    assert_eq!(evaluated.len(), 1);
    assert_eq!(evaluated[0].project.id, id);
    assert!((evaluated[0].evaluation.total_cost - 8363.636363).abs() < 1e-3);
    assert!((evaluated[0].evaluation.margin_percent - 16.363636).abs() < 1e-3);

    // A rate change after saving changes the figures shown for the saved project.
    workspace
        .upsert_rate(&ConsultantRate::new("Strategy Consultant", 44000.0, 500.0))
        .await
        .unwrap();
    let evaluated = workspace.evaluated_projects().await.unwrap();
    let expected = (44000.0 / 220.0) * 30.0 * 2.0 + 1000.0;
    assert!((evaluated[0].evaluation.total_cost - expected).abs() < 1e-9);
}

#[tokio::test]
async fn deleting_a_role_zeroes_its_share_without_error() {
    let store = seeded_store().await;
    let session = session();
    let workspace = Workspace::new(&store, &session);

    let project = Project::new(
        "Platform build",
        20,
        50000.0,
        Assignment::new().with("IT Consultant", 2).with("Senior IT Consultant", 1),
    );
    workspace.apply(&Mutation::Create(project)).await.unwrap();

    workspace.delete_rate("Senior IT Consultant").await.unwrap();

    let evaluated = workspace.evaluated_projects().await.unwrap();
    let expected = (24000.0 / 220.0) * 20.0 * 2.0 + 500.0 * 2.0;
    assert!((evaluated[0].evaluation.total_cost - expected).abs() < 1e-9);
    assert_eq!(evaluated[0].project.assignment.get("Senior IT Consultant"), 1);
}

#[tokio::test]
async fn ghost_role_and_zero_price_scenario() {
    let store = seeded_store().await;
    let session = session();
    let workspace = Workspace::new(&store, &session);

    let project = Project::new("Pro bono", 10, 0.0, Assignment::new().with("Ghost Role", 5));
    workspace.apply(&Mutation::Create(project)).await.unwrap();

    let evaluated = workspace.evaluated_projects().await.unwrap();
    assert_eq!(evaluated[0].evaluation.total_cost, 0.0);
    assert_eq!(evaluated[0].evaluation.profit, 0.0);
    assert_eq!(evaluated[0].evaluation.margin_percent, 0.0);
}

#[tokio::test]
async fn update_and_delete_through_workspace() {
    let store = seeded_store().await;
    let session = session();
    let workspace = Workspace::new(&store, &session);

    let id = workspace
        .apply(&Mutation::Create(Project::new("Audit", 5, 3000.0, Assignment::new())))
        .await
        .unwrap();

    let saved = workspace.get_project(id).await.unwrap();
    let rates = workspace.list_rates().await.unwrap();
    let mut input = ProjectInput::from_project(&saved, &rates);
    input.duration = 8;
    input.assignment.set("IT Consultant", 1);

    let outcome = submit(&input, &workspace.rate_table().await.unwrap(), FormIntent::Save).unwrap();
    let mutation = outcome.mutation.unwrap();
    assert!(matches!(mutation, Mutation::Update(_)));
    assert_eq!(workspace.apply(&mutation).await.unwrap(), id);
    assert_eq!(workspace.get_project(id).await.unwrap().duration, 8);

    workspace.delete_project(id).await.unwrap();
    workspace.delete_project(id).await.unwrap();
    assert!(workspace.list_projects().await.unwrap().is_empty());
    assert!(matches!(
        workspace.get_project(id).await,
        Err(EvaluatorError::NotFound(_))
    ));
}

#[tokio::test]
async fn invalid_update_leaves_project_unchanged() {
    let store = seeded_store().await;
    let session = session();
    let workspace = Workspace::new(&store, &session);

    let id = workspace
        .apply(&Mutation::Create(Project::new("Audit", 5, 3000.0, Assignment::new())))
        .await
        .unwrap();

    let mut broken = workspace.get_project(id).await.unwrap();
    broken.duration = 0;
    broken.name = "Renamed".to_string();

    let result = workspace.apply(&Mutation::Update(broken)).await;
    assert!(matches!(result, Err(EvaluatorError::Validation(_))));
    assert_eq!(workspace.get_project(id).await.unwrap().name, "Audit");
}

#[tokio::test]
async fn exports_every_saved_project() {
    let store = seeded_store().await;
    let session = session();
    let workspace = Workspace::new(&store, &session);

    for name in ["Alpha", "Beta"] {
        let project = Project::new(name, 10, 20000.0, Assignment::new().with("IT Consultant", 1));
        workspace.apply(&Mutation::Create(project)).await.unwrap();
    }

    let rows: Vec<ExportRow> = workspace
        .evaluated_projects()
        .await
        .unwrap()
        .iter()
        .map(EvaluatedProject::export_row)
        .collect();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1].name, "Beta");

    let dir = tempfile::tempdir().unwrap();
    let exporter = Exporter::new(dir.path()).unwrap();
    let spreadsheet = exporter.export(&rows, "all_projects", ExportFormat::Spreadsheet).unwrap();
    let document = exporter.export(&rows, "all_projects", ExportFormat::Document).unwrap();

    assert!(spreadsheet.ends_with("all_projects.xlsx"));
    assert!(document.ends_with("all_projects.pdf"));
    assert!(std::fs::metadata(spreadsheet).unwrap().len() > 0);
    assert!(std::fs::metadata(document).unwrap().len() > 0);
}
