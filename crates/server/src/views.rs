//! Server-rendered pages.
//!
//! Every page takes the caller's login state so the navigation bar can
//! offer either the dashboard/logout pair or the login link.

use crate::pipeline::PredictionOutcome;
use axum::http::StatusCode;
use maud::{DOCTYPE, Markup, PreEscaped, html};
use records::{PatientInfo, ResultLabel, ScanRecord};

const STYLE: &str = r#"
body { font-family: system-ui, sans-serif; margin: 0; color: #1d2733; background: #f5f7fa; }
nav { display: flex; gap: 1rem; align-items: center; padding: 0.8rem 1.5rem; background: #16324f; }
nav a { color: #e6eef7; text-decoration: none; }
nav a.brand { font-weight: 700; margin-right: auto; }
main { max-width: 960px; margin: 2rem auto; padding: 0 1.5rem; }
form.card, section.card { background: #fff; padding: 1.5rem; border-radius: 8px; box-shadow: 0 1px 3px rgba(0,0,0,.1); }
label { display: block; margin-top: 0.8rem; font-weight: 600; }
input, select { width: 100%; padding: 0.45rem; margin-top: 0.25rem; box-sizing: border-box; }
button { margin-top: 1.2rem; padding: 0.6rem 1.4rem; background: #1f6feb; color: #fff; border: 0; border-radius: 6px; cursor: pointer; }
.error { color: #b42318; font-weight: 600; }
.result { font-size: 1.6rem; font-weight: 700; padding: 0.6rem 1rem; border-radius: 6px; display: inline-block; }
.result.covid { background: #fde2e1; color: #b42318; }
.result.normal { background: #dcfce7; color: #166534; }
.result.failed { background: #fef3c7; color: #92400e; }
img.scan { max-width: 100%; max-height: 420px; border-radius: 6px; }
img.thumb { width: 72px; height: 72px; object-fit: cover; border-radius: 4px; }
table { width: 100%; border-collapse: collapse; background: #fff; }
th, td { text-align: left; padding: 0.5rem; border-bottom: 1px solid #e3e8ef; vertical-align: middle; }
"#;

fn layout(title: &str, logged_in: bool, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) " | ChestScan" }
                style { (PreEscaped(STYLE)) }
            }
            body {
                nav {
                    a.brand href="/" { "ChestScan" }
                    a href="/about" { "About" }
                    a href="/details" { "Details" }
                    a href="/how-works" { "How it works" }
                    a href="/help" { "Help" }
                    a href="/history" { "History" }
                    @if logged_in {
                        a href="/dashboard" { "Dashboard" }
                        a href="/logout" { "Logout" }
                    } @else {
                        a href="/login" { "Login" }
                    }
                }
                main { (content) }
            }
        }
    }
}

fn result_class(result: ResultLabel) -> &'static str {
    match result {
        ResultLabel::Covid19 => "result covid",
        ResultLabel::Normal => "result normal",
        ResultLabel::PredictionFailed => "result failed",
    }
}

fn data_uri(mime: &str, base64: &str) -> String {
    format!("data:{mime};base64,{base64}")
}

fn patient_table(patient: &PatientInfo) -> Markup {
    html! {
        table.patient {
            tr { th { "Patient name" } td { (patient.name) } }
            tr { th { "Age" } td { (patient.age) } }
            tr { th { "Gender" } td { (patient.gender) } }
            tr { th { "Referring doctor" } td { (patient.doctor) } }
            tr { th { "Scan date" } td { (patient.scan_date) } }
            tr { th { "Hospital ID" } td { (patient.hospital_id) } }
        }
    }
}

pub fn home(logged_in: bool) -> Markup {
    layout(
        "Home",
        logged_in,
        html! {
            h1 { "Chest scan screening" }
            p {
                "Upload a chest X-ray and get an automated COVID-19 screening result "
                "from a pretrained convolutional neural network, stored alongside the patient details."
            }
            @if logged_in {
                p { a href="/dashboard" { "Go to the dashboard to analyse a scan." } }
            } @else {
                p { a href="/login" { "Log in" } " to analyse a scan." }
            }
            p.disclaimer {
                "Screening aid only. Results must be confirmed by a qualified clinician."
            }
        },
    )
}

pub fn login(logged_in: bool, error: bool) -> Markup {
    layout(
        "Login",
        logged_in,
        html! {
            h1 { "Login" }
            @if error {
                p.error role="alert" { "Invalid username or password." }
            }
            form.card method="post" action="/login" {
                label for="username" { "Username" }
                input #username type="text" name="username" autocomplete="username" required;
                label for="password" { "Password" }
                input #password type="password" name="password" autocomplete="current-password" required;
                button type="submit" { "Log in" }
            }
        },
    )
}

pub fn dashboard() -> Markup {
    layout(
        "Dashboard",
        true,
        html! {
            h1 { "Analyse a chest scan" }
            form.card method="post" action="/predict" enctype="multipart/form-data" {
                label for="file" { "Chest X-ray image" }
                input #file type="file" name="file" accept="image/png,image/jpeg,image/bmp" required;
                label for="name" { "Patient name" }
                input #name type="text" name="name" required;
                label for="age" { "Age" }
                input #age type="number" name="age" min="0" max="130" required;
                label for="gender" { "Gender" }
                select #gender name="gender" required {
                    option value="Male" { "Male" }
                    option value="Female" { "Female" }
                    option value="Other" { "Other" }
                }
                label for="doctor" { "Referring doctor" }
                input #doctor type="text" name="doctor" required;
                label for="scan_date" { "Scan date" }
                input #scan_date type="date" name="scan_date" required;
                label for="hospital_id" { "Hospital ID" }
                input #hospital_id type="text" name="hospital_id" required;
                button type="submit" { "Analyse scan" }
            }
        },
    )
}

pub fn result(outcome: &PredictionOutcome) -> Markup {
    layout(
        "Result",
        true,
        html! {
            h1 { "Scan #" (outcome.sequence_number) }
            section.card {
                p { "Prediction: " span class=(result_class(outcome.result)) { (outcome.result.as_str()) } }
                @if let Some(score) = outcome.score {
                    p { "Model score: " (format!("{score:.3}")) }
                }
                @if outcome.result == ResultLabel::PredictionFailed {
                    p.error { "The image could not be analysed. The upload has still been recorded." }
                }
                img.scan src=(data_uri(outcome.image_mime, &outcome.image_base64)) alt="Uploaded chest scan";
                h2 { "Patient details" }
                (patient_table(&outcome.patient))
                p {
                    a href="/dashboard" { "Analyse another scan" }
                    " | "
                    a href="/history" { "View history" }
                }
            }
        },
    )
}

pub fn history(logged_in: bool, records: &[ScanRecord]) -> Markup {
    layout(
        "History",
        logged_in,
        html! {
            h1 { "Prediction history" }
            @if records.is_empty() {
                p { "No scans have been analysed yet." }
            } @else {
                table.history {
                    thead {
                        tr {
                            th { "#" }
                            th { "Recorded" }
                            th { "Scan" }
                            th { "Result" }
                            th { "Patient" }
                            th { "Age" }
                            th { "Gender" }
                            th { "Doctor" }
                            th { "Scan date" }
                            th { "Hospital ID" }
                        }
                    }
                    tbody {
                        @for record in records {
                            tr {
                                td { (record.sequence_number) }
                                td { (record.timestamp) }
                                td {
                                    img.thumb src=(data_uri(record.image_mime, &record.image_base64))
                                        alt={ "Scan " (record.sequence_number) };
                                }
                                td { span class=(result_class(record.result)) { (record.result.as_str()) } }
                                td { (record.patient.name) }
                                td { (record.patient.age) }
                                td { (record.patient.gender) }
                                td { (record.patient.doctor) }
                                td { (record.patient.scan_date) }
                                td { (record.patient.hospital_id) }
                            }
                        }
                    }
                }
            }
        },
    )
}

pub fn about(logged_in: bool) -> Markup {
    layout(
        "About",
        logged_in,
        html! {
            h1 { "About" }
            p {
                "ChestScan is a demonstration tool that screens chest X-ray images for signs "
                "of COVID-19 pneumonia using a convolutional neural network."
            }
            p {
                "It is intended for teaching and evaluation. It keeps its history in memory only, "
                "so every record is lost when the server restarts."
            }
        },
    )
}

pub fn details(logged_in: bool) -> Markup {
    layout(
        "Details",
        logged_in,
        html! {
            h1 { "Model details" }
            ul {
                li { "Architecture: convolutional neural network with a single sigmoid output." }
                li { "Input: 224 x 224 colour image, pixel values scaled to the range 0 to 1." }
                li { "Output: a score between 0 and 1. Scores above the decision threshold are reported as COVID-19, all others as Normal." }
                li { "Runtime: ONNX Runtime on the CPU, loaded once when the server starts." }
            }
        },
    )
}

pub fn how_it_works(logged_in: bool) -> Markup {
    layout(
        "How it works",
        logged_in,
        html! {
            h1 { "How it works" }
            ol {
                li { "Log in and open the dashboard." }
                li { "Choose a chest X-ray image and fill in the patient details." }
                li { "The image is saved, resized to 224 x 224 and normalised." }
                li { "The classifier produces a score and the score is turned into a label." }
                li { "The result, the image and the patient details are shown and added to the history." }
            }
            p {
                "If the image cannot be read or the model is unavailable, the scan is still recorded "
                "with the result \"Prediction failed\"."
            }
        },
    )
}

pub fn help(logged_in: bool) -> Markup {
    layout(
        "Help",
        logged_in,
        html! {
            h1 { "Help" }
            dl {
                dt { "Which files can I upload?" }
                dd { "PNG, JPEG and BMP images. Grayscale images are accepted and converted automatically." }
                dt { "Why does my result say \"Prediction failed\"?" }
                dd { "The file could not be decoded as an image, or the model is not loaded. Check the file and try again." }
                dt { "Where is my earlier scan?" }
                dd { "The history lists every scan since the server last started. Nothing is kept across restarts." }
            }
        },
    )
}

pub fn error_page(status: StatusCode) -> Markup {
    layout(
        "Error",
        true,
        html! {
            h1 { "Something went wrong" }
            p.error {
                (status.as_u16()) " "
                (status.canonical_reason().unwrap_or("Error"))
            }
            p { "The scan was not recorded. " a href="/dashboard" { "Return to the dashboard" } "." }
        },
    )
}
