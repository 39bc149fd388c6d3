//! World context builder.
//!
//! Turns a list of denizen records into the markdown summary handed to the
//! generation step: totals, type and allegiance breakdowns, discovered
//! domains, the most recent additions, and a flat roster of names.

use serde_json::Value;
use tracing::{debug, instrument};

use worldcontext_markdown::{MarkdownDoc, bold, italic, truncate_chars};
use worldcontext_shared::{ContextLimits, Denizen, Result, WorldContextError};

use crate::tally::{rank_by_count, tally};

/// Returned verbatim when there is nothing to summarise.
pub const EMPTY_ARCHIVE: &str = "The archive is empty. You are cataloguing the first entities.";

/// Shown in Recent Additions when a denizen has no domain.
const DOMAIN_UNKNOWN: &str = "Domain unknown";

/// Build the world context with default limits.
pub fn build_world_context(denizens: &[Denizen]) -> String {
    build_world_context_with(denizens, &ContextLimits::default())
}

/// Build the world context markdown for `denizens`.
///
/// Output sections, in order:
/// 1. Header with the total count
/// 2. Entity Types, most common first
/// 3. Allegiances (only if any denizen has one)
/// 4. Domains Discovered (only if any denizen has one), first-seen order
/// 5. Recent Additions, by descending `id`
/// 6. All Catalogued Entities, in input order
#[instrument(skip_all, fields(denizens = denizens.len()))]
pub fn build_world_context_with(denizens: &[Denizen], limits: &ContextLimits) -> String {
    if denizens.is_empty() {
        debug!("empty archive");
        return EMPTY_ARCHIVE.to_string();
    }

    let mut doc = MarkdownDoc::new();
    doc.line(format!(
        "The archive currently holds {} catalogued entities.",
        bold(&denizens.len().to_string())
    ));

    write_types(&mut doc, denizens);
    write_allegiances(&mut doc, denizens);
    write_domains(&mut doc, denizens, limits.max_domains);
    write_recent(&mut doc, denizens, limits);
    write_roster(&mut doc, denizens);

    let context = doc.finish();
    debug!(bytes = context.len(), "world context built");
    context
}

/// Parse a JSON document into denizen records.
///
/// The top-level value must be an array. Elements are read permissively; see
/// [`Denizen::from_value`].
pub fn parse_denizens(input: &str) -> Result<Vec<Denizen>> {
    let value: Value =
        serde_json::from_str(input).map_err(|e| WorldContextError::parse(e.to_string()))?;

    let Value::Array(items) = value else {
        return Err(WorldContextError::Shape);
    };

    Ok(items.into_iter().map(Denizen::from_value).collect())
}

/// Parse `input` and build its world context in one step.
pub fn build_world_context_from_json(input: &str, limits: &ContextLimits) -> Result<String> {
    let denizens = parse_denizens(input)?;
    Ok(build_world_context_with(&denizens, limits))
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

fn write_types(doc: &mut MarkdownDoc, denizens: &[Denizen]) {
    let counts = rank_by_count(tally(denizens.iter().map(|d| d.kind())));
    debug!(types = counts.len(), "entity types");

    doc.section("Entity Types");
    write_counts(doc, &counts);
}

fn write_allegiances(doc: &mut MarkdownDoc, denizens: &[Denizen]) {
    let counts = rank_by_count(tally(denizens.iter().filter_map(|d| d.allegiance())));
    if counts.is_empty() {
        return;
    }
    debug!(allegiances = counts.len(), "allegiances");

    doc.section("Allegiances");
    write_counts(doc, &counts);
}

fn write_counts(doc: &mut MarkdownDoc, counts: &[(String, usize)]) {
    for (label, count) in counts {
        doc.bullet(format!("{}: {count} entities", bold(label)));
    }
}

fn write_domains(doc: &mut MarkdownDoc, denizens: &[Denizen], max_domains: usize) {
    let domains = tally(denizens.iter().filter_map(|d| d.domain()));
    if domains.is_empty() {
        return;
    }
    debug!(domains = domains.len(), "domains discovered");

    doc.section("Domains Discovered");
    for (domain, count) in domains.iter().take(max_domains) {
        if *count > 1 {
            doc.bullet(format!("{domain} ({count} entities)"));
        } else {
            doc.bullet(domain);
        }
    }

    if domains.len() > max_domains {
        doc.bullet(format!(
            "...and {} more unique domains",
            domains.len() - max_domains
        ));
    }
}

fn write_recent(doc: &mut MarkdownDoc, denizens: &[Denizen], limits: &ContextLimits) {
    // Ids approximate creation order; stable sort keeps input order on ties.
    let mut recent: Vec<&Denizen> = denizens.iter().collect();
    recent.sort_by(|a, b| b.sort_key().cmp(&a.sort_key()));

    doc.section("Recent Additions");
    for d in recent.into_iter().take(limits.max_recent) {
        let domain = d.domain();
        doc.bullet(format!(
            "{} ({}) — {}",
            bold(&d.name()),
            d.kind(),
            domain.as_deref().unwrap_or(DOMAIN_UNKNOWN)
        ));

        if let Some(description) = d.description() {
            let excerpt = truncate_chars(&description, limits.description_max_chars);
            doc.continuation(italic(&excerpt));
        }
    }
}

fn write_roster(doc: &mut MarkdownDoc, denizens: &[Denizen]) {
    let names: Vec<_> = denizens.iter().map(|d| d.name()).collect();

    doc.section("All Catalogued Entities");
    doc.line("Use these names when suggesting connections:");
    doc.line(names.join(", "));
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn denizens(value: Value) -> Vec<Denizen> {
        parse_denizens(&value.to_string()).expect("valid denizen array")
    }

    fn section<'a>(output: &'a str, heading: &str) -> Vec<&'a str> {
        let marker = format!("### {heading}");
        output
            .lines()
            .skip_while(|line| *line != marker)
            .skip(1)
            .take_while(|line| !line.is_empty())
            .collect()
    }

    #[test]
    fn empty_archive_sentence() {
        assert_eq!(build_world_context(&[]), EMPTY_ARCHIVE);
        assert_eq!(
            build_world_context_from_json("[]", &ContextLimits::default()).unwrap(),
            EMPTY_ARCHIVE
        );
    }

    #[test]
    fn single_denizen_full_output() {
        let input = denizens(json!([
            { "id": "a1", "name": "Vex", "type": "Spirit", "domain": "Ashfen" }
        ]));
        let expected = "\
The archive currently holds **1** catalogued entities.

### Entity Types
- **Spirit**: 1 entities

### Domains Discovered
- Ashfen

### Recent Additions
- **Vex** (Spirit) — Ashfen

### All Catalogued Entities
Use these names when suggesting connections:
Vex";
        assert_eq!(build_world_context(&input), expected);
    }

    #[test]
    fn header_counts_every_record() {
        let input = denizens(json!([{}, {}, { "name": "Orla" }]));
        let output = build_world_context(&input);
        assert!(output.starts_with("The archive currently holds **3** catalogued entities."));
    }

    #[test]
    fn types_sorted_by_count_with_stable_ties() {
        let input = denizens(json!([
            { "type": "Wraith" },
            { "type": "Beast" },
            { "name": "Nameless" },
            { "type": "Beast" },
            { "type": "Wraith" },
            { "type": "Golem" },
        ]));
        let output = build_world_context(&input);
        assert_eq!(
            section(&output, "Entity Types"),
            [
                "- **Wraith**: 2 entities",
                "- **Beast**: 2 entities",
                "- **Unknown**: 1 entities",
                "- **Golem**: 1 entities",
            ]
        );
    }

    #[test]
    fn type_counts_sum_to_total() {
        let input = denizens(json!([
            { "type": "A" }, { "type": "B" }, { "type": "A" }, {}, { "type": "C" }
        ]));
        let output = build_world_context(&input);
        let total: usize = section(&output, "Entity Types")
            .iter()
            .map(|line| {
                line.rsplit(": ")
                    .next()
                    .and_then(|rest| rest.split(' ').next())
                    .and_then(|n| n.parse::<usize>().ok())
                    .expect("count in bullet")
            })
            .sum();
        assert_eq!(total, input.len());
    }

    #[test]
    fn allegiances_absent_without_values() {
        let input = denizens(json!([
            { "name": "A", "allegiance": "" },
            { "name": "B", "allegiance": null },
            { "name": "C" },
        ]));
        assert!(!build_world_context(&input).contains("### Allegiances"));
    }

    #[test]
    fn allegiances_counted_when_present() {
        let input = denizens(json!([
            { "allegiance": "Ember Court" },
            { "allegiance": "Tidewatch" },
            { "allegiance": "Tidewatch" },
            { "allegiance": "" },
        ]));
        let output = build_world_context(&input);
        assert_eq!(
            section(&output, "Allegiances"),
            ["- **Tidewatch**: 2 entities", "- **Ember Court**: 1 entities"]
        );
    }

    #[test]
    fn domains_absent_without_values() {
        let input = denizens(json!([{ "name": "A", "domain": "" }, { "name": "B" }]));
        let output = build_world_context(&input);
        assert!(!output.contains("### Domains Discovered"));
        assert!(output.contains("- **A** (Unknown) — Domain unknown"));
    }

    #[test]
    fn domain_count_suffix_only_when_shared() {
        let input = denizens(json!([
            { "domain": "Ashfen" },
            { "domain": "Glasswater" },
            { "domain": "Ashfen" },
            { "domain": "Ashfen" },
        ]));
        let output = build_world_context(&input);
        let lines = section(&output, "Domains Discovered");
        assert_eq!(lines.len(), 2);
        assert!(lines.contains(&"- Ashfen (3 entities)"));
        assert!(lines.contains(&"- Glasswater"));
    }

    #[test]
    fn domains_capped_with_trailer() {
        let records: Vec<Value> = (0..20)
            .map(|i| json!({ "name": format!("d{i}"), "domain": format!("Domain {i:02}") }))
            .collect();
        let output = build_world_context(&denizens(Value::Array(records)));
        let lines = section(&output, "Domains Discovered");

        assert_eq!(lines.len(), 16);
        assert_eq!(lines[15], "- ...and 5 more unique domains");
        assert!(lines[..15].iter().all(|l| l.starts_with("- Domain ")));
    }

    #[test]
    fn exactly_max_domains_has_no_trailer() {
        let records: Vec<Value> = (0..15)
            .map(|i| json!({ "domain": format!("Domain {i}") }))
            .collect();
        let output = build_world_context(&denizens(Value::Array(records)));
        assert_eq!(section(&output, "Domains Discovered").len(), 15);
        assert!(!output.contains("more unique domains"));
    }

    #[test]
    fn recent_additions_by_descending_id() {
        let input = denizens(json!([
            { "id": "a1", "name": "First" },
            { "id": "c3", "name": "Third" },
            { "id": "b2", "name": "Second" },
            { "id": "e5", "name": "Fifth" },
            { "id": "d4", "name": "Fourth" },
            { "id": "f6", "name": "Sixth" },
        ]));
        let output = build_world_context(&input);
        let names: Vec<&str> = section(&output, "Recent Additions")
            .iter()
            .map(|l| l.split("**").nth(1).expect("bold name"))
            .collect();
        assert_eq!(names, ["Sixth", "Fifth", "Fourth", "Third", "Second"]);
    }

    #[test]
    fn recent_additions_ties_keep_input_order() {
        let input = denizens(json!([
            { "name": "NoIdOne" },
            { "id": "z", "name": "Zed" },
            { "name": "NoIdTwo" },
        ]));
        let output = build_world_context(&input);
        assert_eq!(
            section(&output, "Recent Additions"),
            [
                "- **Zed** (Unknown) — Domain unknown",
                "- **NoIdOne** (Unknown) — Domain unknown",
                "- **NoIdTwo** (Unknown) — Domain unknown",
            ]
        );
    }

    #[test]
    fn long_description_truncated() {
        let long = "w".repeat(150);
        let input = denizens(json!([{ "name": "Vex", "description": long }]));
        let output = build_world_context(&input);
        let expected = format!("  _{}..._", "w".repeat(100));
        assert!(output.lines().any(|l| l == expected));
    }

    #[test]
    fn short_description_verbatim() {
        let exact = "s".repeat(100);
        let input = denizens(json!([
            { "name": "A", "description": exact },
            { "name": "B", "description": "" },
        ]));
        let output = build_world_context(&input);
        let lines = section(&output, "Recent Additions");
        assert_eq!(
            lines,
            [
                "- **A** (Unknown) — Domain unknown",
                format!("  _{exact}_").as_str(),
                "- **B** (Unknown) — Domain unknown",
            ]
        );
    }

    #[test]
    fn roster_lists_every_name_in_input_order() {
        let input = denizens(json!([
            { "id": "z", "name": "Orla" },
            { "id": "a" },
            { "id": "m", "name": "Orla" },
            { "name": 9 },
        ]));
        let output = build_world_context(&input);
        assert!(output.ends_with(
            "### All Catalogued Entities\n\
             Use these names when suggesting connections:\n\
             Orla, Unknown, Orla, 9"
        ));
    }

    #[test]
    fn custom_limits_apply() {
        let limits = ContextLimits {
            max_domains: 1,
            max_recent: 1,
            description_max_chars: 4,
        };
        let input = denizens(json!([
            { "id": "1", "name": "Low", "domain": "North" },
            { "id": "2", "name": "High", "domain": "South", "description": "abcdefgh" },
        ]));
        let output = build_world_context_with(&input, &limits);
        assert_eq!(
            section(&output, "Domains Discovered"),
            ["- North", "- ...and 1 more unique domains"]
        );
        assert_eq!(
            section(&output, "Recent Additions"),
            ["- **High** (Unknown) — South", "  _abcd..._"]
        );
    }

    #[test]
    fn output_is_deterministic() {
        let input = denizens(json!([
            { "id": "b", "name": "Vex", "type": "Spirit", "domain": "Ashfen", "allegiance": "Court" },
            { "id": "a", "name": "Orla", "type": "Beast", "domain": "Reach", "description": "Hungry." },
        ]));
        assert_eq!(build_world_context(&input), build_world_context(&input));
    }

    #[test]
    fn non_object_elements_are_tolerated() {
        let output =
            build_world_context_from_json(r#"[1, "x", null]"#, &ContextLimits::default())
                .expect("array input");
        assert!(output.contains("holds **3**"));
        assert!(output.ends_with("Unknown, Unknown, Unknown"));
    }

    #[test]
    fn invalid_json_is_parse_error() {
        let err = parse_denizens("[{").unwrap_err();
        assert!(matches!(err, WorldContextError::Parse { .. }));
        assert!(err.to_string().starts_with("Invalid JSON:"));
    }

    #[test]
    fn non_array_is_shape_error() {
        let err = parse_denizens(r#"{"name": "Vex"}"#).unwrap_err();
        assert!(matches!(err, WorldContextError::Shape));
    }
}
