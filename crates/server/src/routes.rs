use crate::error::AppError;
use crate::form::UploadForm;
use crate::session::Session;
use crate::state::AppState;
use crate::views;
use axum::{
    Form, Router,
    extract::{DefaultBodyLimit, Multipart, State, multipart::MultipartRejection},
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use axum_extra::extract::cookie::SignedCookieJar;
use maud::Markup;
use serde::Deserialize;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

pub fn router(state: AppState, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/login", get(login_form).post(login))
        .route("/dashboard", get(dashboard))
        .route("/predict", post(predict))
        .route("/history", get(history))
        .route("/logout", get(logout))
        .route("/about", get(about))
        .route("/details", get(details))
        .route("/how-works", get(how_it_works))
        .route("/help", get(help))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct LoginForm {
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
}

async fn home(session: Session) -> Markup {
    views::home(session.is_authenticated())
}

async fn login_form(session: Session) -> Markup {
    views::login(session.is_authenticated(), false)
}

async fn login(
    jar: SignedCookieJar,
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Response {
    if state.credentials.verify(&form.username, &form.password) {
        tracing::info!(username = %form.username, "Login succeeded");
        (Session::start(jar), Redirect::to("/dashboard")).into_response()
    } else {
        tracing::warn!(username = %form.username, "Login rejected");
        let logged_in = Session::from_jar(&jar).is_authenticated();
        views::login(logged_in, true).into_response()
    }
}

async fn dashboard(session: Session) -> Response {
    if !session.is_authenticated() {
        return Redirect::to("/login").into_response();
    }
    views::dashboard().into_response()
}

async fn predict(
    session: Session,
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Response, AppError> {
    if !session.is_authenticated() {
        return Ok(Redirect::to("/login").into_response());
    }

    let Ok(multipart) = multipart else {
        tracing::debug!("Upload without a multipart body");
        return Ok(Redirect::to("/dashboard").into_response());
    };

    let mut form = UploadForm::from_multipart(multipart).await?;
    let Some(upload) = form.file.take() else {
        tracing::debug!("Upload without a file");
        return Ok(Redirect::to("/dashboard").into_response());
    };

    // Reject incomplete metadata before anything is written to disk.
    let patient = form.patient()?;
    let outcome = state.pipeline.run(upload, patient).await?;

    Ok(views::result(&outcome).into_response())
}

async fn history(session: Session, State(state): State<AppState>) -> Markup {
    views::history(session.is_authenticated(), &state.store.list_all())
}

async fn logout(jar: SignedCookieJar) -> impl IntoResponse {
    (Session::clear(jar), Redirect::to("/"))
}

async fn about(session: Session) -> Markup {
    views::about(session.is_authenticated())
}

async fn details(session: Session) -> Markup {
    views::details(session.is_authenticated())
}

async fn how_it_works(session: Session) -> Markup {
    views::how_it_works(session.is_authenticated())
}

async fn help(session: Session) -> Markup {
    views::help(session.is_authenticated())
}
