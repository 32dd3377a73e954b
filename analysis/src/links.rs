use crate::errors::CallerResult;
use crate::salvage::extract_edge_lines;
use casework_sdk::{
    parse_structured, strip_code_fences, AnalysisRecord, ChatModel, ChatRequest, GraphEdge,
    GraphNode, LinkGraph, Message, Parsed,
};
use tracing::warn;

const MAX_TOKENS: u32 = 1500;

const SYSTEM_PROMPT: &str = "You are an assistant for criminal-investigation support staff. \
You map relationships between people, vehicles, locations, and organizations mentioned in case material.";

/// Extracts a relationship graph for link analysis.
pub struct LinkAnalyzer<'a> {
    chat: &'a dyn ChatModel,
    language: String,
}

impl<'a> LinkAnalyzer<'a> {
    pub fn new(chat: &'a dyn ChatModel, language: impl Into<String>) -> Self {
        Self {
            chat,
            language: language.into(),
        }
    }

    pub async fn analyze(
        &self,
        case_id: &str,
        filename: &str,
        text: &str,
    ) -> CallerResult<AnalysisRecord<LinkGraph>> {
        let request = ChatRequest {
            messages: vec![
                Message::system(SYSTEM_PROMPT),
                Message::user(build_prompt(&self.language, text)),
            ],
            max_tokens: MAX_TOKENS,
        };
        let reply = self.chat.complete(request).await?;
        Ok(parse_reply(&reply).into_record(case_id, filename))
    }
}

fn build_prompt(language: &str, text: &str) -> String {
    format!(
        r#"Extract every entity and relationship from the case material below for link analysis.

Output ONLY valid JSON, no markdown, using exactly this schema:
{{
  "nodes": [{{ "id": "n1", "label": "entity name", "kind": "person|vehicle|location|organization|other" }}],
  "edges": [{{ "source": "n1", "target": "n2", "label": "relationship" }}]
}}

Use sequential ids n1, n2, n3. Write all labels in {language}.

MATERIAL:
{text}"#
    )
}

fn parse_reply(reply: &str) -> Parsed<LinkGraph> {
    if let Some(graph) = parse_structured::<LinkGraph>(reply) {
        return Parsed::Structured(graph);
    }
    let body = strip_code_fences(reply);
    if let Some(graph) = salvage_graph(body) {
        warn!("link reply was not valid JSON, salvaging edge lines");
        return Parsed::Salvaged(graph);
    }
    warn!("link reply had no recoverable graph, defaulting to empty");
    Parsed::Defaulted(LinkGraph::default())
}

/// Rebuild a graph from `source -> target: label` lines. Nodes are deduped
/// by label and typed "other" since the kind is unrecoverable from text.
fn salvage_graph(body: &str) -> Option<LinkGraph> {
    let lines = extract_edge_lines(body);
    if lines.is_empty() {
        return None;
    }

    let mut graph = LinkGraph::default();
    for (source, target, label) in lines {
        let source_id = node_id(&mut graph, &source);
        let target_id = node_id(&mut graph, &target);
        graph.edges.push(GraphEdge {
            source: source_id,
            target: target_id,
            label,
        });
    }
    Some(graph)
}

fn node_id(graph: &mut LinkGraph, label: &str) -> String {
    if let Some(node) = graph.nodes.iter().find(|node| node.label == label) {
        return node.id.clone();
    }
    let id = format!("n{}", graph.nodes.len() + 1);
    graph.nodes.push(GraphNode {
        id: id.clone(),
        label: label.to_string(),
        kind: "other".to_string(),
    });
    id
}

#[cfg(test)]
mod tests {
    use super::*;
    use casework_sdk::Confidence;

    #[test]
    fn structured_reply_parses_at_full_confidence() {
        let parsed = parse_reply(
            r#"{"nodes":[{"id":"n1","label":"José","kind":"person"}],"edges":[]}"#,
        );
        assert_eq!(parsed.confidence(), Confidence::Structured);
        assert_eq!(parsed.value().nodes.len(), 1);
    }

    #[test]
    fn arrow_lines_salvage_into_a_graph() {
        let parsed = parse_reply("José -> Gol branco: proprietário\nGol branco -> Rua das Flores: avistado em");
        assert_eq!(parsed.confidence(), Confidence::Salvaged);
        let graph = parsed.value();
        assert_eq!(graph.nodes.len(), 3);
        assert_eq!(graph.edges.len(), 2);
        // the shared node is not duplicated
        assert_eq!(graph.edges[0].target, graph.edges[1].source);
    }

    #[test]
    fn prose_without_edges_defaults_to_an_empty_graph() {
        let parsed = parse_reply("Não foi possível identificar vínculos.");
        assert_eq!(parsed.confidence(), Confidence::Defaulted);
        assert!(parsed.value().nodes.is_empty());
        assert!(parsed.value().edges.is_empty());
    }
}
