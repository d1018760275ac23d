//! QTI 2.1 assessment item rendering.
//!
//! Produces one `assessmentItem` document per item: a multiple-cardinality
//! response declaration, the fixed outcome declarations, a `choiceInteraction`,
//! the response processing tree, and two modal feedback blocks.

use qtipack_core::error::{PackageError, Result};
use qtipack_core::model::AssessmentItem;
use qtipack_core::rules::{
    Action, Branch, Condition, FeedbackIds, ResponseProcessing, RuleCondition, Status,
    DEFAULT_MAX_SCORE, DEFAULT_MIN_SCORE, DEFAULT_SCORE, FEEDBACKBASIC, FEEDBACKMODAL, MAXSCORE,
    MINSCORE, RESPONSE, SCORE,
};

use crate::xml::{find_invalid_char, Document, Element};

pub const QTI_NAMESPACE: &str = "http://www.imsglobal.org/xsd/imsqti_v2p1";
pub const XSI_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema-instance";
pub const QTI_SCHEMA_LOCATION: &str =
    "http://www.imsglobal.org/xsd/imsqti_v2p1 http://www.imsglobal.org/xsd/qti/qtiv2p1/imsqti_v2p1.xsd";

/// Render an item, its grading tree, and its feedback blocks.
///
/// Fails with [`PackageError::Serialization`] if the tree does not belong to
/// the item: a correct id that is not a choice, a correct response that
/// differs from the item's, a feedback id with no matching block, or text
/// holding a character XML 1.0 forbids.
pub fn render_item(
    item: &AssessmentItem,
    processing: &ResponseProcessing,
    feedback: &FeedbackIds,
    shuffle: bool,
) -> Result<Document> {
    check_consistency(item, processing, feedback)?;

    let root = Element::new("assessmentItem")
        .attr("xmlns", QTI_NAMESPACE)
        .attr("xmlns:xsi", XSI_NAMESPACE)
        .attr("xsi:schemaLocation", QTI_SCHEMA_LOCATION)
        .attr("identifier", &item.id)
        .attr("title", &item.title)
        .attr("adaptive", "false")
        .attr("timeDependent", "false")
        .child(response_declaration(&item.correct_ids))
        .children(outcome_declarations())
        .child(item_body(item, shuffle))
        .child(response_processing(processing))
        .child(modal_feedback(&feedback.correct, "Correct", &item.feedback.success))
        .child(modal_feedback(
            &feedback.incorrect,
            "Incorrect",
            &item.feedback.error,
        ));

    tracing::debug!(item_id = %item.id, "rendered item");
    Ok(Document::new(root))
}

fn check_consistency(
    item: &AssessmentItem,
    processing: &ResponseProcessing,
    feedback: &FeedbackIds,
) -> Result<()> {
    let fail = |message: String| PackageError::Serialization {
        item_id: item.id.clone(),
        message,
    };

    if item.choices.is_empty() {
        return Err(fail("item has no choices".into()));
    }
    if let Some(id) = item.correct_ids.iter().find(|id| item.choice(id).is_none()) {
        return Err(fail(format!("correct id {id} is not a choice")));
    }
    if processing.correct_response != item.correct_ids {
        return Err(fail("response processing was built for another item".into()));
    }
    if feedback.correct == feedback.incorrect {
        return Err(fail(format!(
            "feedback blocks share identifier {}",
            feedback.correct
        )));
    }
    for id in processing.feedback_ids() {
        if id != feedback.correct && id != feedback.incorrect {
            return Err(fail(format!("rule references unregistered feedback {id}")));
        }
    }

    let texts = [
        ("title", item.title.as_str()),
        ("stem", item.stem.as_str()),
        ("success feedback", item.feedback.success.as_str()),
        ("error feedback", item.feedback.error.as_str()),
    ]
    .into_iter()
    .chain(item.choices.iter().map(|c| (c.id.as_str(), c.text.as_str())));
    for (field, text) in texts {
        if let Some(c) = find_invalid_char(text) {
            return Err(fail(format!(
                "{field} contains character U+{:04X} not allowed in XML",
                c as u32
            )));
        }
    }
    Ok(())
}

fn base_value(base_type: &str, value: impl Into<String>) -> Element {
    Element::new("baseValue")
        .attr("baseType", base_type)
        .text(value)
}

fn variable(identifier: &str) -> Element {
    Element::new("variable").attr("identifier", identifier)
}

fn response_declaration(correct_ids: &[String]) -> Element {
    Element::new("responseDeclaration")
        .attr("identifier", RESPONSE)
        .attr("cardinality", "multiple")
        .attr("baseType", "identifier")
        .child(
            Element::new("correctResponse").children(
                correct_ids
                    .iter()
                    .map(|id| Element::new("value").text(id.as_str())),
            ),
        )
}

fn outcome_declaration(
    identifier: &str,
    cardinality: &str,
    base_type: &str,
    default: Option<String>,
) -> Element {
    let decl = Element::new("outcomeDeclaration")
        .attr("identifier", identifier)
        .attr("cardinality", cardinality)
        .attr("baseType", base_type);
    match default {
        Some(value) => {
            decl.child(Element::new("defaultValue").child(Element::new("value").text(value)))
        }
        None => decl,
    }
}

fn outcome_declarations() -> Vec<Element> {
    vec![
        outcome_declaration(SCORE, "single", "float", Some(DEFAULT_SCORE.to_string())),
        outcome_declaration(
            MAXSCORE,
            "single",
            "float",
            Some(DEFAULT_MAX_SCORE.to_string()),
        ),
        outcome_declaration(
            MINSCORE,
            "single",
            "float",
            Some(DEFAULT_MIN_SCORE.to_string()),
        ),
        outcome_declaration(
            FEEDBACKBASIC,
            "single",
            "identifier",
            Some(Status::Empty.to_string()),
        ),
        outcome_declaration(FEEDBACKMODAL, "multiple", "identifier", None),
    ]
}

fn item_body(item: &AssessmentItem, shuffle: bool) -> Element {
    let interaction = Element::new("choiceInteraction")
        .attr("responseIdentifier", RESPONSE)
        .attr("shuffle", shuffle.to_string())
        .attr("maxChoices", "0")
        .children(item.choices.iter().map(|choice| {
            Element::new("simpleChoice")
                .attr("identifier", &choice.id)
                .child(Element::new("p").text(choice.text.as_str()))
        }));

    Element::new("itemBody")
        .child(Element::new("p").text(item.stem.as_str()))
        .child(interaction)
}

fn response_processing(processing: &ResponseProcessing) -> Element {
    Element::new("responseProcessing").children(processing.rules.iter().map(response_condition))
}

fn response_condition(rule: &RuleCondition) -> Element {
    let mut condition =
        Element::new("responseCondition").child(branch("responseIf", &rule.when));
    for alternative in &rule.else_when {
        condition = condition.child(branch("responseElseIf", alternative));
    }
    if let Some(actions) = &rule.otherwise {
        condition = condition.child(Element::new("responseElse").children(actions.iter().map(action)));
    }
    condition
}

fn branch(name: &str, branch: &Branch) -> Element {
    Element::new(name)
        .child(expression(&branch.condition))
        .children(branch.actions.iter().map(action))
}

fn expression(condition: &Condition) -> Element {
    match condition {
        Condition::IsNull => Element::new("isNull").child(variable(RESPONSE)),
        Condition::MatchCorrect => Element::new("match")
            .child(variable(RESPONSE))
            .child(Element::new("correct").attr("identifier", RESPONSE)),
        Condition::StatusIs(status) => Element::new("match")
            .child(base_value("identifier", status.as_str()))
            .child(variable(FEEDBACKBASIC)),
    }
}

fn set_outcome(identifier: &str, value: Element) -> Element {
    Element::new("setOutcomeValue")
        .attr("identifier", identifier)
        .child(value)
}

fn action(action: &Action) -> Element {
    match action {
        Action::SetStatus(status) => {
            set_outcome(FEEDBACKBASIC, base_value("identifier", status.as_str()))
        }
        Action::AddMaxScore => set_outcome(
            SCORE,
            Element::new("sum")
                .child(variable(SCORE))
                .child(variable(MAXSCORE)),
        ),
        Action::ResetScore => set_outcome(SCORE, base_value("float", DEFAULT_SCORE.to_string())),
        Action::ShowFeedback(id) => set_outcome(
            FEEDBACKMODAL,
            Element::new("multiple")
                .child(variable(FEEDBACKMODAL))
                .child(base_value("identifier", id.as_str())),
        ),
    }
}

fn modal_feedback(identifier: &str, title: &str, text: &str) -> Element {
    Element::new("modalFeedback")
        .attr("identifier", identifier)
        .attr("outcomeIdentifier", FEEDBACKMODAL)
        .attr("showHide", "show")
        .attr("title", title)
        .child(Element::new("p").text(text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use qtipack_core::model::{Choice, ItemFeedback};
    use qtipack_core::rules::synthesize;

    fn item() -> AssessmentItem {
        AssessmentItem {
            id: "Iabc".into(),
            title: "Item 1".into(),
            stem: "Value is $$x$$ when...".into(),
            choices: vec![
                Choice {
                    id: "ID_1".into(),
                    text: "true one".into(),
                },
                Choice {
                    id: "ID_2".into(),
                    text: "false one".into(),
                },
                Choice {
                    id: "ID_3".into(),
                    text: "also true".into(),
                },
            ],
            correct_ids: vec!["ID_1".into(), "ID_3".into()],
            feedback: ItemFeedback {
                success: "Good".into(),
                error: "Bad".into(),
            },
        }
    }

    fn feedback() -> FeedbackIds {
        FeedbackIds {
            correct: "FBok".into(),
            incorrect: "FBno".into(),
        }
    }

    fn render(shuffle: bool) -> Document {
        let item = item();
        let rp = synthesize(&item.correct_ids, &feedback());
        render_item(&item, &rp, &feedback(), shuffle).unwrap()
    }

    #[test]
    fn root_declares_namespaces() {
        let doc = render(true);
        let root = &doc.root;
        assert_eq!(root.name, "assessmentItem");
        assert_eq!(root.get_attr("xmlns"), Some(QTI_NAMESPACE));
        assert_eq!(root.get_attr("xmlns:xsi"), Some(XSI_NAMESPACE));
        assert_eq!(root.get_attr("xsi:schemaLocation"), Some(QTI_SCHEMA_LOCATION));
        assert_eq!(root.get_attr("identifier"), Some("Iabc"));
        assert_eq!(root.get_attr("title"), Some("Item 1"));
    }

    #[test]
    fn correct_response_lists_correct_ids() {
        let doc = render(true);
        let decl = doc.root.first("responseDeclaration").unwrap();
        assert_eq!(decl.get_attr("cardinality"), Some("multiple"));
        assert_eq!(decl.get_attr("baseType"), Some("identifier"));
        let values: Vec<String> = decl
            .descendants("value")
            .iter()
            .map(|v| v.text_content())
            .collect();
        assert_eq!(values, vec!["ID_1", "ID_3"]);
    }

    #[test]
    fn outcome_defaults() {
        let doc = render(true);
        let outcomes: Vec<(&str, Option<String>)> = doc
            .root
            .elements()
            .filter(|e| e.name == "outcomeDeclaration")
            .map(|e| {
                (
                    e.get_attr("identifier").unwrap(),
                    e.descendants("value").first().map(|v| v.text_content()),
                )
            })
            .collect();
        assert_eq!(
            outcomes,
            vec![
                ("SCORE", Some("0".to_string())),
                ("MAXSCORE", Some("1".to_string())),
                ("MINSCORE", Some("0".to_string())),
                ("FEEDBACKBASIC", Some("empty".to_string())),
                ("FEEDBACKMODAL", None),
            ]
        );
    }

    #[test]
    fn body_keeps_choice_order_and_shuffle_flag() {
        let doc = render(false);
        let body = doc.root.first("itemBody").unwrap();
        assert_eq!(
            body.first("p").unwrap().text_content(),
            "Value is $$x$$ when..."
        );
        let interaction = body.first("choiceInteraction").unwrap();
        assert_eq!(interaction.get_attr("shuffle"), Some("false"));
        assert_eq!(interaction.get_attr("maxChoices"), Some("0"));
        let ids: Vec<&str> = interaction
            .elements()
            .filter_map(|c| c.get_attr("identifier"))
            .collect();
        assert_eq!(ids, vec!["ID_1", "ID_2", "ID_3"]);

        assert_eq!(
            render(true)
                .root
                .descendants("choiceInteraction")[0]
                .get_attr("shuffle"),
            Some("true")
        );
    }

    #[test]
    fn processing_branch_structure() {
        let doc = render(true);
        let rp = doc.root.first("responseProcessing").unwrap();
        let conditions: Vec<&Element> = rp.elements().collect();
        assert_eq!(conditions.len(), 3);

        let grading: Vec<&str> = conditions[0].elements().map(|e| e.name.as_str()).collect();
        assert_eq!(grading, vec!["responseIf", "responseElseIf", "responseElse"]);
        let first = conditions[0].first("responseIf").unwrap();
        assert!(first.first("isNull").is_some());
        let second = conditions[0].first("responseElseIf").unwrap();
        assert!(second.first("match").unwrap().first("correct").is_some());
        assert!(second.descendants("sum").len() == 1);

        for (condition, fb) in conditions[1..].iter().zip(["FBok", "FBno"]) {
            let ids: Vec<String> = condition
                .descendants("baseValue")
                .iter()
                .map(|b| b.text_content())
                .collect();
            assert!(ids.contains(&fb.to_string()));
        }
    }

    #[test]
    fn modal_feedback_blocks_match_rules() {
        let doc = render(true);
        let blocks: Vec<&Element> = doc
            .root
            .elements()
            .filter(|e| e.name == "modalFeedback")
            .collect();
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].get_attr("identifier"), Some("FBok"));
        assert_eq!(blocks[0].first("p").unwrap().text_content(), "Good");
        assert_eq!(blocks[1].get_attr("identifier"), Some("FBno"));
        assert_eq!(blocks[1].get_attr("outcomeIdentifier"), Some(FEEDBACKMODAL));
    }

    #[test]
    fn element_order_follows_schema() {
        let doc = render(true);
        let names: Vec<&str> = doc.root.elements().map(|e| e.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "responseDeclaration",
                "outcomeDeclaration",
                "outcomeDeclaration",
                "outcomeDeclaration",
                "outcomeDeclaration",
                "outcomeDeclaration",
                "itemBody",
                "responseProcessing",
                "modalFeedback",
                "modalFeedback",
            ]
        );
    }

    #[test]
    fn unregistered_feedback_is_serialization_error() {
        let item = item();
        let rp = synthesize(&item.correct_ids, &feedback());
        let other = FeedbackIds {
            correct: "FBx".into(),
            incorrect: "FBy".into(),
        };
        let err = render_item(&item, &rp, &other, true).unwrap_err();
        assert!(matches!(err, PackageError::Serialization { .. }));
        assert!(err.to_string().contains("unregistered feedback"));
    }

    #[test]
    fn foreign_processing_is_rejected() {
        let item = item();
        let rp = synthesize(&["ID_2".to_string()], &feedback());
        assert!(render_item(&item, &rp, &feedback(), true).is_err());
    }

    #[test]
    fn unknown_correct_id_is_rejected() {
        let mut item = item();
        item.correct_ids = vec!["ID_9".into()];
        let rp = synthesize(&item.correct_ids, &feedback());
        let err = render_item(&item, &rp, &feedback(), true).unwrap_err();
        assert!(err.to_string().contains("ID_9"));
    }

    #[test]
    fn control_character_in_stem_is_rejected() {
        let mut item = item();
        item.stem = "bad \u{1} char".into();
        let rp = synthesize(&item.correct_ids, &feedback());
        let err = render_item(&item, &rp, &feedback(), true).unwrap_err();
        assert!(matches!(err, PackageError::Serialization { ref item_id, .. } if item_id == "Iabc"));
        assert!(err.to_string().contains("stem contains character U+0001"));
    }

    #[test]
    fn control_character_in_choice_names_the_choice() {
        let mut item = item();
        item.choices[1].text = "vertical\u{B}tab".into();
        let rp = synthesize(&item.correct_ids, &feedback());
        let err = render_item(&item, &rp, &feedback(), true).unwrap_err();
        assert!(err.to_string().contains("ID_2 contains character U+000B"));
    }

    #[test]
    fn xml_text_is_well_formed() {
        let xml = render(true).to_xml();
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<assessmentItem "));
        assert!(xml.contains("<simpleChoice identifier=\"ID_2\">"));
        assert!(xml.contains("<baseValue baseType=\"identifier\">empty</baseValue>"));
        assert!(xml.trim_end().ends_with("</assessmentItem>"));
    }
}
