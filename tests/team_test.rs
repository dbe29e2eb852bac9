mod common;

use serde_json::Value;

use common::{Factory, TestApp};

#[tokio::test]
async fn test_list_teams_with_usernames() {
    let app = TestApp::new().await;
    let factory = Factory::new(&app.state);
    let ana = factory.create_user("ana").await;
    let bo = factory.create_user("bo").await;

    factory
        .create_team("Platform", Some(ana.user.user_id), Some(bo.user.user_id))
        .await;
    factory.create_team("Design", None, Some(4242)).await;

    let response = app
        .server
        .get("/teams")
        .add_header("Authorization", ana.auth_header())
        .await;

    response.assert_status_ok();

    let teams: Vec<Value> = response.json();
    assert_eq!(teams.len(), 2);

    assert_eq!(teams[0]["teamName"], "Platform");
    assert_eq!(teams[0]["productOwnerUsername"], "ana");
    assert_eq!(teams[0]["projectManagerUsername"], "bo");

    // Unknown ids resolve to no username
    assert_eq!(teams[1]["teamName"], "Design");
    assert!(teams[1].get("productOwnerUsername").is_none());
    assert!(teams[1].get("projectManagerUsername").is_none());
    assert_eq!(teams[1]["projectManagerUserId"], 4242);
}
