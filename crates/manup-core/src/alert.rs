use manup_host::{
    Alert, AlertButton, AlertKind, DialogChoice, PlatformPolicy, TranslationKey, Translator,
};

use crate::decision::Classification;

const APP_PLACEHOLDER: &str = "{{app}}";

fn builtin_text(key: TranslationKey) -> &'static str {
    match key {
        TranslationKey::MaintenanceTitle => "{{app}} Unavailable",
        TranslationKey::MaintenanceText => {
            "{{app}} is currently unavailable, please check back again later."
        }
        TranslationKey::MandatoryTitle => "Update Required",
        TranslationKey::MandatoryText => "An update to {{app}} is required to continue.",
        TranslationKey::OptionalTitle => "Update Available",
        TranslationKey::OptionalText => {
            "An update to {{app}} is available. Would you like to update?"
        }
        TranslationKey::ButtonUpdate => "Update",
        TranslationKey::ButtonLater => "Not Now",
    }
}

fn text(key: TranslationKey, app_name: &str, translator: Option<&dyn Translator>) -> String {
    let template = translator
        .and_then(|translator| translator.translate(key))
        .unwrap_or_else(|| builtin_text(key).to_string());
    template.replace(APP_PLACEHOLDER, app_name)
}

/// Render the alert for `classification`, or `None` when the app may simply
/// proceed.
#[must_use]
pub fn build_alert(
    classification: Classification,
    policy: &PlatformPolicy,
    app_name: &str,
    translator: Option<&dyn Translator>,
) -> Option<Alert> {
    let kind = classification.alert_kind()?;
    let button = |key, choice| AlertButton {
        label: text(key, app_name, translator),
        choice,
    };

    let buttons = match kind {
        AlertKind::Maintenance => Vec::new(),
        AlertKind::Mandatory => vec![button(TranslationKey::ButtonUpdate, DialogChoice::Update)],
        AlertKind::Optional => vec![
            button(TranslationKey::ButtonLater, DialogChoice::Later),
            button(TranslationKey::ButtonUpdate, DialogChoice::Update),
        ],
    };

    Some(Alert {
        kind,
        title: text(kind.title_key(), app_name, translator),
        text: text(kind.text_key(), app_name, translator),
        buttons,
        update_url: policy.update_url.clone(),
    })
}
