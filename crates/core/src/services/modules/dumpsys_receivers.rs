//! Module analysing the receivers registered with the package manager.
//!
//! Spyware implants commonly register broadcast receivers to intercept
//! SMS traffic and call state, so beyond indicator matching this module
//! surfaces receivers listening on a short list of intents known to be
//! abused.

use tracing::{info, Span};

use crate::artifacts::{extract_section, ArtifactParser, ReceiverResolverParser};
use crate::bundle::EvidenceBundle;
use crate::indicators::{match_indicators, IndicatorSet};
use crate::services::runner::{ArtifactModule, ModuleError, ModuleOutput};

/// Artifact file this module consumes.
pub const DUMPSYS_FILE_NAME: &str = "dumpsys.txt";

/// Anchor of the package-manager section inside the combined dump.
pub const PACKAGE_SERVICE_ANCHOR: &str = "DUMP OF SERVICE package:";

const INTENT_NEW_OUTGOING_SMS: &str = "android.provider.Telephony.NEW_OUTGOING_SMS";
const INTENT_SMS_RECEIVED: &str = "android.provider.Telephony.SMS_RECEIVED";
const INTENT_DATA_SMS_RECEIVED: &str = "android.intent.action.DATA_SMS_RECEIVED";
const INTENT_PHONE_STATE: &str = "android.intent.action.PHONE_STATE";
const INTENT_NEW_OUTGOING_CALL: &str = "android.intent.action.NEW_OUTGOING_CALL";

/// Intents worth flagging to the analyst even without an indicator hit.
const WATCHED_INTENTS: &[(&str, &str)] = &[
    (INTENT_NEW_OUTGOING_SMS, "intercept outgoing SMS messages"),
    (INTENT_SMS_RECEIVED, "intercept incoming SMS messages"),
    (INTENT_DATA_SMS_RECEIVED, "intercept incoming data SMS messages"),
    (INTENT_PHONE_STATE, "monitor phone state and incoming calls"),
    (INTENT_NEW_OUTGOING_CALL, "monitor outgoing calls"),
];

/// Extracts and analyses the receiver resolver table from `dumpsys.txt`.
///
/// Holds its parser by delegation and a per-instance logging span, so two
/// instances running concurrently never share mutable state.
#[derive(Debug)]
pub struct DumpsysReceiversModule {
    parser: ReceiverResolverParser,
    span: Span,
}

impl DumpsysReceiversModule {
    pub fn new() -> Self {
        Self::with_span(tracing::info_span!("module", name = "dumpsys-receivers"))
    }

    /// Construct with an explicitly supplied logging span. The span is
    /// entered for the duration of each run.
    pub fn with_span(span: Span) -> Self {
        Self { parser: ReceiverResolverParser::new(), span }
    }
}

impl Default for DumpsysReceiversModule {
    fn default() -> Self {
        Self::new()
    }
}

impl ArtifactModule for DumpsysReceiversModule {
    fn name(&self) -> &'static str {
        "dumpsys-receivers"
    }

    fn artifact_name(&self) -> &'static str {
        DUMPSYS_FILE_NAME
    }

    fn run(
        &self,
        bundle: &EvidenceBundle,
        indicators: &IndicatorSet,
    ) -> Result<ModuleOutput, ModuleError> {
        let _guard = self.span.enter();

        // No artifact in the bundle is a successful no-op.
        let Some(path) = bundle.find_files(DUMPSYS_FILE_NAME).into_iter().next() else {
            return Ok(ModuleOutput::empty());
        };

        let raw = bundle.read_raw(&path)?;
        let text = raw.text();
        let section = extract_section(&text, PACKAGE_SERVICE_ANCHOR);
        let results = self.parser.parse(&section);

        for (intent, capability) in WATCHED_INTENTS {
            if let Some(record) = results.get(intent) {
                for receiver in &record.receivers {
                    info!("Found a receiver able to {}: \"{}\"", capability, receiver);
                }
            }
        }
        info!("Extracted receivers for {} intents", results.len());

        let detections = match_indicators(&results, indicators);
        Ok(ModuleOutput { results, detections })
    }
}
