//! Prompt templates for extraction and AI-assisted merging

use super::record::ToolRecord;

pub const TRUNCATION_MARKER: &str = "...[content truncated]";

const OUTPUT_SHAPE: &str = r#"[
  {
    "name": "Tool name",
    "description": "Tool description",
    "url": "https://tool.example",
    "category": "Tool category",
    "tags": ["tag1", "tag2", "tag3"]
  }
]"#;

/// Builds the extraction prompt; `content` is optional seed material
pub fn extraction_prompt(content: &str) -> String {
    format!(
        r#"# Background
You are a professional AI tool data generator that produces and curates information about AI tools.

# Objective
Produce the following information for each AI tool:
1. Tool name
2. Tool description: core features and typical use cases
3. Tool URL: a complete, reachable link
4. Tool category, following common AI tool taxonomies (AI office tools, AI video tools, AI coding tools, AI chat assistants, AI writing tools, AI learning sites)
5. Tool tags: several relevant keywords derived from the description

# Key Requirements
- The information must be accurate
- Names should be short and clear
- Return at least 10 tools

# Expected Output
Return only a JSON array in this format:
{shape}

# Content
{content}
"#,
        shape = OUTPUT_SHAPE,
        content = content.trim()
    )
}

/// Cuts `text` to at most `max_chars` characters, appending a marker when cut
///
/// The cut may land inside a JSON token; the result is not re-validated.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_offset, _)) => format!("{}{}", &text[..byte_offset], TRUNCATION_MARKER),
        None => text.to_string(),
    }
}

fn serialize_records(records: &[ToolRecord]) -> String {
    serde_json::to_string_pretty(records).unwrap_or_else(|_| "[]".to_string())
}

/// Builds the merge prompt, truncating each dataset independently
pub fn merge_prompt(existing: &[ToolRecord], incoming: &[ToolRecord], max_chars: usize) -> String {
    let existing_json = truncate_chars(&serialize_records(existing), max_chars);
    let incoming_json = truncate_chars(&serialize_records(incoming), max_chars);

    format!(
        r#"# Background
You are a data consolidation assistant that merges and deduplicates AI tool records.

# Objective
Merge two datasets:
1. existing_data: tools already stored
2. new_data: freshly extracted tools

# Key Requirements
- Deduplicate by URL first: records with the same URL are the same tool
- When the URL is empty, use the lowercased tool name as the identity
- Keep the most complete record when merging
- If the new description is longer, use the new description
- Merge tag lists and remove duplicate tags
- Keep the record format unchanged

# Expected Output
Return only the merged JSON array, in the same format as the input:
{shape}

# Existing Data
{existing}

# New Data
{incoming}
"#,
        shape = OUTPUT_SHAPE,
        existing = existing_json,
        incoming = incoming_json
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short_text_untouched() {
        assert_eq!(truncate_chars("abc", 3), "abc");
        assert_eq!(truncate_chars("abc", 10), "abc");
    }

    #[test]
    fn test_truncate_appends_marker() {
        assert_eq!(truncate_chars("abcdef", 3), format!("abc{}", TRUNCATION_MARKER));
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(
            truncate_chars("智能写作助手", 2),
            format!("智能{}", TRUNCATION_MARKER)
        );
    }

    #[test]
    fn test_extraction_prompt_embeds_content() {
        let prompt = extraction_prompt("  video editing tools ");
        assert!(prompt.contains("# Content\nvideo editing tools\n"));
        assert!(prompt.contains("\"tags\""));
    }

    #[test]
    fn test_merge_prompt_truncates_each_side_independently() {
        let existing: Vec<ToolRecord> = (0..50)
            .map(|i| ToolRecord::new(format!("tool-{}", i)).with_description("x".repeat(40)))
            .collect();
        let incoming = vec![ToolRecord::new("fresh")];

        let prompt = merge_prompt(&existing, &incoming, 200);

        assert_eq!(prompt.matches(TRUNCATION_MARKER).count(), 1);
        assert!(prompt.contains("\"name\": \"fresh\""));
        assert!(!prompt.contains("tool-49"));
    }
}
