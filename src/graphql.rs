use async_graphql::{http::GraphiQLSource, EmptySubscription, MergedObject, Schema};
use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::get,
    Extension, Json, Router,
};
use tracing::instrument;

use crate::{
    auth::{
        extractors::Viewer,
        resolvers::{AuthMutation, AuthQuery},
    },
    recipes::resolvers::{RecipeMutation, RecipeQuery},
    state::AppState,
    users::resolvers::{UserMutation, UserQuery},
};

#[derive(MergedObject, Default)]
pub struct QueryRoot(UserQuery, AuthQuery, RecipeQuery);

#[derive(MergedObject, Default)]
pub struct MutationRoot(AuthMutation, UserMutation, RecipeMutation);

pub type AppSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

pub fn build_schema(state: AppState) -> AppSchema {
    Schema::build(QueryRoot::default(), MutationRoot::default(), EmptySubscription)
        .data(state)
        .finish()
}

pub fn router(state: AppState) -> Router<AppState> {
    let schema = build_schema(state);
    Router::new()
        .route("/graphql", get(playground).post(graphql_handler))
        .layer(Extension(schema))
}

#[instrument(skip_all)]
pub async fn graphql_handler(
    Extension(schema): Extension<AppSchema>,
    viewer: Viewer,
    Json(req): Json<async_graphql::Request>,
) -> Json<async_graphql::Response> {
    Json(schema.execute(req.data(viewer)).await)
}

pub async fn playground(State(state): State<AppState>) -> impl IntoResponse {
    if !state.config.graphql_playground {
        return (StatusCode::NOT_FOUND, "Not found").into_response();
    }
    Html(GraphiQLSource::build().endpoint("/graphql").finish()).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::test_state;
    use serde_json::{json, Value};

    const REGISTER: &str = r#"
        mutation {
          register(input: {
            fullname: "Rina Wulandari", gender: "female", email: "rina@example.com",
            password: "password123", birthDate: "1994-08-17"
          }) { token user { id email createdAt } }
        }"#;

    async fn run(schema: &AppSchema, query: &str, viewer: Viewer) -> Value {
        let res = schema
            .execute(async_graphql::Request::new(query).data(viewer))
            .await;
        serde_json::to_value(&res).unwrap()
    }

    #[tokio::test]
    async fn register_then_login_then_me() {
        let state = test_state();
        let keys = state.jwt.clone();
        let schema = build_schema(state);

        let reg = run(&schema, REGISTER, Viewer::Anonymous).await;
        assert!(reg.get("errors").is_none(), "{reg}");
        let id = reg["data"]["register"]["user"]["id"].as_i64().unwrap();

        let login = run(
            &schema,
            r#"mutation { login(email: "rina@example.com", password: "password123") { token user { id createdAt } } }"#,
            Viewer::Anonymous,
        )
        .await;
        assert!(login.get("errors").is_none(), "{login}");
        let token = login["data"]["login"]["token"].as_str().unwrap();
        assert!(!login["data"]["login"]["user"]["createdAt"]
            .as_str()
            .unwrap()
            .contains('T'));

        let viewer = Viewer::from_header(&keys, Some(&format!("Bearer {token}")));
        let me = run(&schema, "{ me { id email } }", viewer).await;
        assert_eq!(me["data"]["me"]["id"].as_i64(), Some(id));
        assert_eq!(me["data"]["me"]["email"], json!("rina@example.com"));
    }

    #[tokio::test]
    async fn login_error_carries_message_only() {
        let schema = build_schema(test_state());
        run(&schema, REGISTER, Viewer::Anonymous).await;

        let res = run(
            &schema,
            r#"mutation { login(email: "rina@example.com", password: "wrong-pass") { token } }"#,
            Viewer::Anonymous,
        )
        .await;
        let err = &res["errors"][0];
        assert_eq!(err["message"], json!("Wrong password"));
        assert!(err.get("extensions").is_none());
        assert!(res["data"].is_null());
    }

    #[tokio::test]
    async fn register_error_keeps_its_code() {
        let schema = build_schema(test_state());
        run(&schema, REGISTER, Viewer::Anonymous).await;
        let res = run(&schema, REGISTER, Viewer::Anonymous).await;
        let err = &res["errors"][0];
        assert_eq!(err["message"], json!("Email already registered"));
        assert_eq!(err["extensions"]["code"], json!("CONFLICT"));
    }

    #[tokio::test]
    async fn protected_fields_require_a_token() {
        let schema = build_schema(test_state());
        let res = run(&schema, "{ me { id } }", Viewer::Anonymous).await;
        assert_eq!(res["errors"][0]["extensions"]["code"], json!("UNAUTHENTICATED"));
        assert_eq!(res["errors"][0]["message"], json!("Authentication required"));

        let res = run(&schema, "{ me { id } }", Viewer::Rejected).await;
        assert_eq!(res["errors"][0]["message"], json!("Invalid or expired token"));
    }

    #[tokio::test]
    async fn validate_token_query_returns_claims() {
        let state = test_state();
        let keys = state.jwt.clone();
        let schema = build_schema(state);
        let token = keys.sign(5, "agus@example.com").unwrap();

        let query = format!(r#"{{ validateToken(token: "{token}") {{ sub email }} }}"#);
        let res = run(&schema, &query, Viewer::Anonymous).await;
        assert_eq!(res["data"]["validateToken"]["sub"], json!(5));
        assert_eq!(res["data"]["validateToken"]["email"], json!("agus@example.com"));

        let res = run(&schema, r#"{ validateToken(token: "x.y.z") { sub } }"#, Viewer::Anonymous).await;
        assert_eq!(res["errors"][0]["message"], json!("Invalid or expired token"));
    }

    #[tokio::test]
    async fn recipe_lifecycle_through_schema() {
        let state = test_state();
        let keys = state.jwt.clone();
        let schema = build_schema(state);

        let reg = run(&schema, REGISTER, Viewer::Anonymous).await;
        let token = reg["data"]["register"]["token"].as_str().unwrap().to_string();
        let author = || Viewer::from_header(&keys, Some(&format!("Bearer {token}")));

        let created = run(
            &schema,
            r#"mutation { createRecipe(input: { title: "Rendang", ingredients: ["beef", "coconut milk"] }) { id createdAt ingredients { ingredient createdAt } } }"#,
            author(),
        )
        .await;
        assert!(created.get("errors").is_none(), "{created}");
        let id = created["data"]["createRecipe"]["id"].as_i64().unwrap();
        assert_eq!(
            created["data"]["createRecipe"]["ingredients"][1]["ingredient"],
            json!("coconut milk")
        );
        let user_created = reg["data"]["register"]["user"]["createdAt"].as_str().unwrap();
        let recipe_created = created["data"]["createRecipe"]["createdAt"].as_str().unwrap();
        for ts in [
            user_created,
            recipe_created,
            created["data"]["createRecipe"]["ingredients"][0]["createdAt"]
                .as_str()
                .unwrap(),
        ] {
            assert!(ts.contains('T') && ts.ends_with('Z'), "{ts}");
        }

        let anon = run(
            &schema,
            &format!("mutation {{ deleteRecipe(id: {id}) }}"),
            Viewer::Anonymous,
        )
        .await;
        assert_eq!(anon["errors"][0]["extensions"]["code"], json!("UNAUTHENTICATED"));

        let deleted = run(&schema, &format!("mutation {{ deleteRecipe(id: {id}) }}"), author()).await;
        assert_eq!(deleted["data"]["deleteRecipe"], json!(true));

        let listed = run(&schema, "{ recipes { id } }", Viewer::Anonymous).await;
        assert_eq!(listed["data"]["recipes"], json!([]));
    }

    #[tokio::test]
    async fn deleted_account_token_stops_working() {
        let state = test_state();
        let keys = state.jwt.clone();
        let schema = build_schema(state);

        let reg = run(&schema, REGISTER, Viewer::Anonymous).await;
        let token = reg["data"]["register"]["token"].as_str().unwrap().to_string();
        let holder = || Viewer::from_header(&keys, Some(&format!("Bearer {token}")));

        let gone = run(&schema, "mutation { deleteAccount }", holder()).await;
        assert_eq!(gone["data"]["deleteAccount"], json!(true));

        let created = run(
            &schema,
            r#"mutation { createRecipe(input: { title: "Pecel" }) { id authorId } }"#,
            holder(),
        )
        .await;
        assert!(created["data"].is_null(), "{created}");
        assert_eq!(created["errors"][0]["extensions"]["code"], json!("UNAUTHENTICATED"));
        assert_eq!(created["errors"][0]["message"], json!("Invalid or expired token"));

        let me = run(&schema, "{ me { id } }", holder()).await;
        assert_eq!(me["errors"][0]["extensions"]["code"], json!("UNAUTHENTICATED"));

        let again = run(&schema, "mutation { deleteAccount }", holder()).await;
        assert_eq!(again["errors"][0]["message"], json!("Invalid or expired token"));

        let listed = run(&schema, "{ recipes { id } }", Viewer::Anonymous).await;
        assert_eq!(listed["data"]["recipes"], json!([]));
    }
}
