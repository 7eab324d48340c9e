//! Note model: field list, the two card templates and the `req` table Anki uses to decide which
//! cards a note generates.

use serde_json::{json, Value};

pub const FIELD_WORD: &str = "GermanWord";
pub const FIELD_SENTENCE: &str = "ExampleSentence";
pub const FIELD_TRANSLATION: &str = "Translation";

const CSS: &str = ".card {\n font-family: arial;\n font-size: 20px;\n text-align: center;\n color: black;\n background-color: white;\n}\n";

const LATEX_PRE: &str = "\\documentclass[12pt]{article}\n\\special{papersize=3in,5in}\n\\usepackage[utf8]{inputenc}\n\\usepackage{amssymb,amsmath}\n\\pagestyle{empty}\n\\setlength{\\parindent}{0in}\n\\begin{document}\n";

const LATEX_POST: &str = "\\end{document}";

/// One card template (front `qfmt`, back `afmt`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardTemplate {
    pub name: String,
    pub qfmt: String,
    pub afmt: String,
}

/// Anki note type with ordered fields and card templates.
#[derive(Debug, Clone)]
pub struct NoteModel {
    pub id: i64,
    pub name: String,
    pub fields: Vec<String>,
    pub templates: Vec<CardTemplate>,
}

impl NoteModel {
    /// The word-learning model: word/sentence/translation fields with a forward
    /// (German → English) and a reverse (English → German) template.
    pub fn word_learning(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            fields: vec![
                FIELD_WORD.to_string(),
                FIELD_SENTENCE.to_string(),
                FIELD_TRANSLATION.to_string(),
            ],
            templates: vec![
                CardTemplate {
                    name: "German → English".to_string(),
                    qfmt: format!("{{{{{}}}}}<br><br>{{{{{}}}}}", FIELD_WORD, FIELD_SENTENCE),
                    afmt: format!("{{{{FrontSide}}}}<hr id=\"answer\">{{{{{}}}}}", FIELD_TRANSLATION),
                },
                CardTemplate {
                    name: "English → German".to_string(),
                    qfmt: format!("{{{{{}}}}}", FIELD_TRANSLATION),
                    afmt: format!(
                        "{{{{FrontSide}}}}<hr id=\"answer\">{{{{{}}}}}<br><br>{{{{{}}}}}",
                        FIELD_WORD, FIELD_SENTENCE
                    ),
                },
            ],
        }
    }

    /// Number of cards each note of this model produces.
    pub fn cards_per_note(&self) -> usize {
        self.templates.len()
    }

    /// Required-field table: for each template, the ords of the fields its front side references.
    /// A card is generated when any of them is non-empty.
    pub fn requirements(&self) -> Vec<Value> {
        self.templates
            .iter()
            .enumerate()
            .map(|(ord, template)| {
                let required: Vec<usize> = referenced_fields(&template.qfmt)
                    .iter()
                    .filter_map(|name| self.fields.iter().position(|f| f == name))
                    .collect();
                if required.is_empty() {
                    json!([ord, "none", []])
                } else {
                    json!([ord, "any", required])
                }
            })
            .collect()
    }

    /// JSON entry stored in the collection's `models` column.
    pub fn to_json(&self, deck_id: i64, modified_secs: i64) -> Value {
        let flds: Vec<Value> = self
            .fields
            .iter()
            .enumerate()
            .map(|(ord, name)| {
                json!({
                    "name": name,
                    "ord": ord,
                    "font": "Arial",
                    "size": 20,
                    "media": [],
                    "rtl": false,
                    "sticky": false,
                })
            })
            .collect();

        let tmpls: Vec<Value> = self
            .templates
            .iter()
            .enumerate()
            .map(|(ord, t)| {
                json!({
                    "name": t.name,
                    "ord": ord,
                    "qfmt": t.qfmt,
                    "afmt": t.afmt,
                    "bqfmt": "",
                    "bafmt": "",
                    "did": null,
                })
            })
            .collect();

        json!({
            "id": self.id.to_string(),
            "name": self.name,
            "type": 0,
            "mod": modified_secs,
            "usn": -1,
            "sortf": 0,
            "did": deck_id,
            "tmpls": tmpls,
            "flds": flds,
            "css": CSS,
            "latexPre": LATEX_PRE,
            "latexPost": LATEX_POST,
            "latexsvg": false,
            "req": self.requirements(),
            "tags": [],
            "vers": [],
        })
    }
}

/// Field names referenced as `{{Field}}` (modifiers such as `text:` and section markers stripped).
/// `FrontSide` and other special names are dropped by the caller when they match no field.
fn referenced_fields(template: &str) -> Vec<String> {
    let mut names = Vec::new();
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else {
            break;
        };
        let inner = after[..end].trim().trim_start_matches(['#', '^', '/']);
        let name = inner.rsplit(':').next().unwrap_or(inner).trim();
        if !name.is_empty() && !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
        rest = &after[end + 2..];
    }
    names
}
