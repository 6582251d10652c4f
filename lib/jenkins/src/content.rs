//! Recovery of credential fields from the Jenkins configuration page.
//!
//! The JSON API exposes only metadata. The editable fields (username,
//! private key, kubeconfig, ...) are only visible in the HTML form Jenkins
//! renders at `.../credential/{id}/update`, so they are scraped from there.
//! Password, passphrase and secret fields are never recovered.

use devops_credentials_core::CredentialKind;
use scraper::{Html, Selector};
use serde::Serialize;
use std::sync::LazyLock;

static ID: LazyLock<Selector> = LazyLock::new(|| selector(r#"input[name*="id"][type="text"]"#));
static DESCRIPTION: LazyLock<Selector> =
    LazyLock::new(|| selector(r#"input[name*="description"]"#));
static USERNAME: LazyLock<Selector> = LazyLock::new(|| selector(r#"input[name*="username"]"#));
static PRIVATE_KEY: LazyLock<Selector> =
    LazyLock::new(|| selector(r#"textarea[name*="privateKey"]"#));
static KUBECONFIG: LazyLock<Selector> =
    LazyLock::new(|| selector(r#"textarea[name*="content"]"#));

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("valid selector")
}

/// Editable fields of a credential, as shown on its configuration page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum CredentialContent {
    UsernamePassword {
        id: String,
        username: String,
        description: String,
    },
    Ssh {
        id: String,
        username: String,
        passphrase: String,
        private_key: String,
        description: String,
    },
    SecretText {
        id: String,
        description: String,
    },
    Kubeconfig {
        id: String,
        content: String,
        description: String,
    },
}

/// `value` attribute of the last element matching `selector`, empty when
/// that element carries none.
fn last_value(document: &Html, selector: &Selector) -> String {
    document
        .select(selector)
        .last()
        .and_then(|e| e.value().attr("value"))
        .unwrap_or_default()
        .to_string()
}

/// Text of the last element matching `selector`.
fn last_text(document: &Html, selector: &Selector) -> String {
    document
        .select(selector)
        .last()
        .map(|e| e.text().collect::<String>())
        .unwrap_or_default()
}

/// Extracts the editable fields of a credential of `kind` from its configuration page.
#[must_use]
pub fn scrape_content(html: &str, kind: CredentialKind) -> CredentialContent {
    let document = Html::parse_document(html);
    let id = last_value(&document, &ID);
    let description = last_value(&document, &DESCRIPTION);

    match kind {
        CredentialKind::UsernamePassword => CredentialContent::UsernamePassword {
            id,
            username: last_value(&document, &USERNAME),
            description,
        },
        CredentialKind::Ssh => CredentialContent::Ssh {
            id,
            username: last_value(&document, &USERNAME),
            passphrase: String::new(),
            private_key: last_text(&document, &PRIVATE_KEY),
            description,
        },
        CredentialKind::SecretText => CredentialContent::SecretText { id, description },
        CredentialKind::Kubeconfig => CredentialContent::Kubeconfig {
            id,
            content: last_text(&document, &KUBECONFIG),
            description,
        },
    }
}
