//! Prompt construction for query generation

use crate::config::Config;
use serde::{Deserialize, Serialize};

/// Literal token swapped for the embedding model id after rendering
pub const EMBEDDING_MODEL_PLACEHOLDER: &str = "embedding_model_id";

/// Enumerated values the model may use in keyword filters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vocabulary {
    #[serde(default)]
    pub concerns: Vec<String>,
    #[serde(default)]
    pub emerging_risks: Vec<String>,
    #[serde(default)]
    pub misc_topics: Vec<String>,
    #[serde(default)]
    pub naics_codes: Vec<String>,
}

impl Default for Vocabulary {
    fn default() -> Self {
        fn owned(items: &[&str]) -> Vec<String> {
            items.iter().map(|s| s.to_string()).collect()
        }

        Self {
            concerns: owned(&[
                "PFAS",
                "Microplastics",
                "Glyphosate",
                "Talc",
                "Ethylene Oxide",
                "Social Inflation",
            ]),
            emerging_risks: owned(&[
                "Climate Change",
                "Wildfire",
                "Cyber Attack",
                "Artificial Intelligence",
                "Supply Chain Disruption",
            ]),
            misc_topics: owned(&["Litigation", "Regulation", "Product Recall", "Data Privacy"]),
            naics_codes: owned(&["524126", "524113", "524114", "325199", "562211"]),
        }
    }
}

const SCHEMA_TEMPLATE: &str = r#"Index Name: {index}

Field Mappings (exact names):
- title (text)
- data (text)
- description (text)
- reason_identified (text)
- published_time (text)
- last_update_time (text)
- injection_time (text)
- is_latest (boolean)
- url (keyword)
- concerns (keyword)
- emerging_risk_name (keyword)
- region (keyword)
- miscTopics (keyword)
- naicscode (keyword)
- naics_description (keyword)
- source (keyword)
- tag (keyword)
- doc_id (long)
- source_meta (object: {rss_entry (text), title (text)})
- chunk_id (integer)
- field (text): name of the field the chunk was cut from
- chunk_text (text): chunk content
- chunk_vector (knn_vector, 1024-dim): embedding of chunk_text

Vector Fields (semantic search):
- chunk_vector (covers title, data and reason_identified)

Available Values:
- Concerns: {concerns}
- Emerging Risks: {emerging_risks}
- Misc Topics: {misc_topics}
- NAICS Codes: {naics_codes}
- Tags: Current, Potential New Trend, Untagged, Processing Error
"#;

const INSTRUCTION_TEMPLATE: &str = r#"
You convert natural language questions into valid OpenSearch DSL query bodies.

INDEX SCHEMA:
{schema}

USER QUERY: {query}

RULES:
1. Output ONLY one JSON object: the OpenSearch query body.
2. Field names must match the schema exactly (case-sensitive).
3. Topic or content questions (title, data, reason_identified, general subject)
   use a knn query on `chunk_vector`:
   {
     "knn": {
       "field": "chunk_vector",
       "query_vector_builder": {
         "text_embedding": {
           "model_id": "embedding_model_id",
           "model_text": "<USER_QUERY_TEXT>"
         }
       },
       "k": 10,
       "num_candidates": 100
     }
   }
4. Metadata questions (tag, source, region, concerns, emerging_risk_name,
   miscTopics, naicscode) use `term`, `terms`, `match` or `range` on those fields.
5. Hybrid questions use `bool.must` holding both the filters and the knn clause.
   Never put `knn` under `filter`.
6. Field types:
   - Keyword: tag, source, concerns, emerging_risk_name, miscTopics, naicscode, naics_description, region, url
   - Text: title, description, data, reason_identified, chunk_text
   - Boolean: is_latest
   - Numeric: doc_id, chunk_id
   - Date/time: published_time, last_update_time, injection_time
7. "Show all articles" is match_all. "Show recent articles" is a range on published_time.
8. No prose, no markdown, no explanations.

EXAMPLES:

Query: "Show me all articles tagged as Current"
{
  "query": {
    "term": {
      "tag": "Current"
    }
  }
}

Query: "Find articles about climate change"
{
  "knn": {
    "field": "chunk_vector",
    "query_vector_builder": {
      "text_embedding": {
        "model_id": "embedding_model_id",
        "model_text": "climate change"
      }
    },
    "k": 10,
    "num_candidates": 100
  }
}

Query: "Find articles about lawsuits tagged as Current"
{
  "query": {
    "bool": {
      "must": [
        { "term": { "tag": "Current" } },
        {
          "knn": {
            "field": "chunk_vector",
            "query_vector_builder": {
              "text_embedding": {
                "model_id": "embedding_model_id",
                "model_text": "lawsuits"
              }
            },
            "k": 10,
            "num_candidates": 100
          }
        }
      ]
    }
  }
}

Query: "Show articles with wildfire for last 3 days"
{
  "query": {
    "bool": {
      "must": [
        { "range": { "published_time": { "gte": "now-3d/d", "lte": "now" } } },
        {
          "knn": {
            "field": "chunk_vector",
            "query_vector_builder": {
              "text_embedding": {
                "model_id": "embedding_model_id",
                "model_text": "wildfire"
              }
            },
            "k": 10,
            "num_candidates": 100
          }
        }
      ]
    }
  }
}
"#;

/// Builds the query-generation prompt
#[derive(Debug, Clone)]
pub struct PromptComposer {
    vocabulary: Vocabulary,
    embedding_model_id: String,
    index_name: String,
}

impl PromptComposer {
    pub fn new(
        vocabulary: Vocabulary,
        embedding_model_id: impl Into<String>,
        index_name: impl Into<String>,
    ) -> Self {
        Self {
            vocabulary,
            embedding_model_id: embedding_model_id.into(),
            index_name: index_name.into(),
        }
    }

    /// Vocabulary, embedding model and index taken from `config`
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.vocabulary.clone(),
            config.model_service.embedding_model.clone(),
            config.search.index.clone(),
        )
    }

    pub fn with_index_name(mut self, index_name: impl Into<String>) -> Self {
        self.index_name = index_name.into();
        self
    }

    pub fn embedding_model_id(&self) -> &str {
        &self.embedding_model_id
    }

    /// Index schema with the vocabulary lists filled in
    pub fn schema_description(&self) -> String {
        let concerns = enumerate(&self.vocabulary.concerns);
        let emerging_risks = enumerate(&self.vocabulary.emerging_risks);
        let misc_topics = enumerate(&self.vocabulary.misc_topics);
        let naics_codes = enumerate(&self.vocabulary.naics_codes);

        render(
            SCHEMA_TEMPLATE,
            &[
                ("index", self.index_name.as_str()),
                ("concerns", concerns.as_str()),
                ("emerging_risks", emerging_risks.as_str()),
                ("misc_topics", misc_topics.as_str()),
                ("naics_codes", naics_codes.as_str()),
            ],
        )
    }

    /// Full prompt for `user_query`.
    ///
    /// Schema and query are substituted first; the embedding model id then
    /// replaces every literal `embedding_model_id` token, including the ones
    /// nested inside the examples.
    pub fn compose(&self, user_query: &str) -> String {
        let schema = self.schema_description();
        let prompt = render(
            INSTRUCTION_TEMPLATE,
            &[("schema", schema.as_str()), ("query", user_query)],
        );
        prompt.replace(EMBEDDING_MODEL_PLACEHOLDER, &self.embedding_model_id)
    }
}

fn enumerate(values: &[String]) -> String {
    format!("{}...", values.join(", "))
}

/// Single-pass `{name}` substitution. Braces not naming a variable are kept
/// verbatim, and substituted values are never rescanned.
fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];

        let hit = vars
            .iter()
            .find(|(name, _)| after.starts_with(name) && after[name.len()..].starts_with('}'));

        match hit {
            Some((name, value)) => {
                out.push_str(value);
                rest = &after[name.len() + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}
