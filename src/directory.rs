use std::collections::HashMap;

use crate::api::{ApiClient, ElementInfo, ElementQuery, PartInfo};
use crate::error::RequestError;

pub const PARTSTUDIO: &str = "PARTSTUDIO";
pub const ASSEMBLY: &str = "ASSEMBLY";

/// One entry in the selector. Immutable once listed. `query` is `None` when
/// the listing lacked the ids needed to navigate to the element.
#[derive(Clone, Debug)]
pub struct SelectableElement {
    pub label: String,
    pub query: Option<ElementQuery>,
}

/// Fetch the element directory and expand part studios into one choice per
/// part. Part listings are requested concurrently; the result preserves the
/// server's element order.
pub async fn load_directory(
    client: &ApiClient,
    document_id: &str,
    workspace_id: &str,
) -> Result<Vec<SelectableElement>, RequestError> {
    let elements = client.elements(document_id, workspace_id).await?;

    let studio_ids: Vec<String> = elements
        .iter()
        .filter(|e| e.element_type == PARTSTUDIO)
        .filter_map(|e| e.id.clone())
        .collect();
    let part_lists = futures::future::try_join_all(
        studio_ids
            .iter()
            .map(|id| client.element_parts(id, document_id, workspace_id)),
    )
    .await?;

    let mut parts_by_element: HashMap<String, Vec<PartInfo>> = HashMap::new();
    for (id, parts) in studio_ids.into_iter().zip(part_lists) {
        parts_by_element.insert(id, parts);
    }

    Ok(build_choices(
        &elements,
        &parts_by_element,
        document_id,
        workspace_id,
    ))
}

/// Assemble selector entries from a directory listing. Elements that are
/// neither part studios nor assemblies are skipped; listed entries without an
/// id become unnavigable choices.
pub fn build_choices(
    elements: &[ElementInfo],
    parts_by_element: &HashMap<String, Vec<PartInfo>>,
    document_id: &str,
    workspace_id: &str,
) -> Vec<SelectableElement> {
    let query_for = |element_id: &str, part_id: Option<&str>| ElementQuery {
        document_id: document_id.to_string(),
        workspace_id: workspace_id.to_string(),
        element_id: element_id.to_string(),
        part_id: part_id.map(str::to_owned),
    };

    let mut choices = Vec::new();
    for element in elements {
        match element.element_type.as_str() {
            ASSEMBLY => choices.push(SelectableElement {
                label: element.name.clone(),
                query: element.id.as_deref().map(|id| query_for(id, None)),
            }),
            PARTSTUDIO => {
                let Some(id) = element.id.as_deref() else {
                    choices.push(SelectableElement {
                        label: element.name.clone(),
                        query: None,
                    });
                    continue;
                };
                match parts_by_element.get(id).filter(|p| !p.is_empty()) {
                    Some(parts) => {
                        for part in parts {
                            choices.push(SelectableElement {
                                label: format!("{} - {}", element.name, part.name),
                                query: Some(query_for(&part.element_id, Some(&part.part_id))),
                            });
                        }
                    }
                    // Part studio with no listed parts: translate the whole
                    // element.
                    None => choices.push(SelectableElement {
                        label: element.name.clone(),
                        query: Some(query_for(id, None)),
                    }),
                }
            }
            other => log::debug!("skipping element '{}' of type {}", element.name, other),
        }
    }
    choices
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element(id: Option<&str>, name: &str, element_type: &str) -> ElementInfo {
        ElementInfo {
            id: id.map(str::to_owned),
            name: name.to_string(),
            element_type: element_type.to_string(),
        }
    }

    fn part(element_id: &str, part_id: &str, name: &str) -> PartInfo {
        PartInfo {
            element_id: element_id.to_string(),
            part_id: part_id.to_string(),
            name: name.to_string(),
        }
    }

    #[test]
    fn part_studio_expands_to_one_choice_per_part() {
        let elements = vec![element(Some("e1"), "Bracket", PARTSTUDIO)];
        let mut parts = HashMap::new();
        parts.insert(
            "e1".to_string(),
            vec![part("e1", "p1", "Base"), part("e1", "p2", "Arm")],
        );

        let choices = build_choices(&elements, &parts, "d", "w");

        assert_eq!(choices.len(), 2);
        assert_eq!(choices[0].label, "Bracket - Base");
        let query = choices[1].query.as_ref().unwrap();
        assert_eq!(query.part_id.as_deref(), Some("p2"));
        assert_eq!(query.element_id, "e1");
    }

    #[test]
    fn assembly_yields_single_choice_without_part() {
        let elements = vec![element(Some("e2"), "Main Assembly", ASSEMBLY)];
        let choices = build_choices(&elements, &HashMap::new(), "d", "w");

        assert_eq!(choices.len(), 1);
        let query = choices[0].query.as_ref().unwrap();
        assert_eq!(query.element_id, "e2");
        assert!(query.part_id.is_none());
    }

    #[test]
    fn unknown_element_types_are_skipped() {
        let elements = vec![
            element(Some("e1"), "Notes", "BLOB"),
            element(Some("e2"), "Asm", ASSEMBLY),
        ];
        let choices = build_choices(&elements, &HashMap::new(), "d", "w");
        assert_eq!(choices.len(), 1);
        assert_eq!(choices[0].label, "Asm");
    }

    #[test]
    fn missing_id_yields_unnavigable_choice() {
        let elements = vec![element(None, "Ghost", ASSEMBLY)];
        let choices = build_choices(&elements, &HashMap::new(), "d", "w");
        assert_eq!(choices.len(), 1);
        assert!(choices[0].query.is_none());
    }

    #[test]
    fn server_order_is_preserved() {
        let elements = vec![
            element(Some("a"), "First", ASSEMBLY),
            element(Some("b"), "Second", ASSEMBLY),
        ];
        let choices = build_choices(&elements, &HashMap::new(), "d", "w");
        let labels: Vec<&str> = choices.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, ["First", "Second"]);
    }
}
