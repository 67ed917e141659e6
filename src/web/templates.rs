//! Page markup for the classifier UI.

use maud::{html, Markup, PreEscaped, DOCTYPE};

use crate::sentiment::{Label, Prediction};
use crate::web::handlers::ClassifyOutcome;
use crate::web::SampleReview;

const PAGE_TITLE: &str = "IMDB Sentiment Classifier";

const POSITIVE_COLOR: &str = "#00C851";
const NEGATIVE_COLOR: &str = "#ff4444";

const PLACEHOLDER: &str =
    "Example: I really loved this movie! The story was emotional and the acting was amazing.";

/// Message shown when the review box is submitted blank.
pub const EMPTY_REVIEW_WARNING: &str = "Please write a review to classify.";

const PAGE_CSS: &str = r#"
body {
    background-color: #1E1E1E;
    color: white;
    font-family: "Source Sans Pro", sans-serif;
    margin: 0;
}
main { max-width: 730px; margin: 0 auto; padding: 3rem 1rem; }
textarea {
    width: 100%;
    height: 150px;
    box-sizing: border-box;
    border-radius: 10px !important;
    padding: 0.75rem;
    font-size: 1rem;
    background-color: #262730;
    color: white;
    border: 1px solid #444;
}
button {
    margin-top: 0.75rem;
    border-radius: 8px;
    padding: 0.6rem 1.2rem;
    background-color: #6C63FF;
    color: white;
    border: none;
    font-size: 1rem;
    cursor: pointer;
}
button:hover { background-color: #5548e0; color: white; }
.warning {
    padding: 15px;
    border-radius: 10px;
    margin-top: 15px;
    background-color: #ffbd4533;
    border: 1px solid #ffbd45;
    color: #ffbd45;
}
"#;

/// Render the base HTML layout.
pub fn layout(title: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) }
                style { (PreEscaped(PAGE_CSS)) }
            }
            body {
                main { (content) }
            }
        }
    }
}

/// The whole page: header, review form, optional outcome, example reviews.
pub fn page(samples: &[SampleReview], review: &str, outcome: Option<&ClassifyOutcome>) -> Markup {
    let content = html! {
        (header())

        h3 { "📝 Enter Your Movie Review" }
        form method="post" action="/classify" {
            label for="review" { "Type a movie review below:" }
            textarea id="review" name="review" placeholder=(PLACEHOLDER) { (review) }
            button type="submit" { "🔍 Classify Review" }
        }

        @if let Some(outcome) = outcome {
            (outcome_panel(outcome))
        }

        h2 { "⭐ Example Reviews and Predictions" }
        @for sample in samples {
            (sample_card(sample))
        }
    };

    layout(PAGE_TITLE, content)
}

fn header() -> Markup {
    html! {
        h1 style="text-align:center; color:white;" {
            "🎬 IMDB Movie Review Classifier"
        }
        p style="text-align:center; font-size:18px; color:#BBBBBB;" {
            "This app uses an LSTM-based RNN model trained on the IMDB dataset to classify movie reviews."
        }
    }
}

fn outcome_panel(outcome: &ClassifyOutcome) -> Markup {
    match outcome {
        ClassifyOutcome::Empty => html! {
            div class="warning" role="alert" { (EMPTY_REVIEW_WARNING) }
        },
        ClassifyOutcome::Classified(prediction) => result_panel(prediction),
        ClassifyOutcome::Failed(message) => html! {
            div class="warning" role="alert" style=(panel_style(NEGATIVE_COLOR)) {
                "Could not classify the review: " (message)
            }
        },
    }
}

/// Result box for a classified review, confidence to 4 decimal places.
pub fn result_panel(prediction: &Prediction) -> Markup {
    let color = label_color(prediction.label);
    html! {
        div class="prediction" style=(panel_style(color)) {
            h3 style=(format!("color:{color};")) { "Prediction: " (prediction.label) }
            p style="color:white;" { (format!("Confidence: {:.4}", prediction.probability)) }
        }
    }
}

/// Card for one example review, confidence to 3 decimal places.
pub fn sample_card(sample: &SampleReview) -> Markup {
    let color = label_color(sample.prediction.label);
    html! {
        div class="sample" style="background-color:#2C2C2C; padding:15px; border-radius:10px; margin-bottom:10px;" {
            h4 style="color:white;" { "Review " (sample.number) }
            p style="color:#CCCCCC;" { (sample.text) }
            p style=(format!("color:{color};")) {
                b { "Prediction:" }
                " " (sample.prediction.label)
                (format!(" — Confidence {:.3}", sample.prediction.probability))
            }
        }
    }
}

fn panel_style(color: &str) -> String {
    format!(
        "padding:15px; border-radius:10px; background-color:{color}33; border:1px solid {color}; margin-top:15px;"
    )
}

fn label_color(label: Label) -> &'static str {
    match label {
        Label::Positive => POSITIVE_COLOR,
        Label::Negative => NEGATIVE_COLOR,
    }
}
