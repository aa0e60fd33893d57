//! # Transform Tier Tests (T0-T4)
//!
//! If ANY tier fails, the transform output is INVALID.
//!
//! ## Tiers
//! - T0: Verse Record Shape
//! - T1: Lexical Extraction
//! - T2: Alternate Readings
//! - T3: Apparatus Filtering
//! - T4: Documents and Storage

use mikra_core::{
    Element, MarkupNode, StrongsNumber, TransformOptions, Variant, VerseData, VerseRef,
    extract_strongs, transform_node, transform_verse, word_gematria,
};

fn w(lemma: &str, morph: &str, text: &str) -> Element {
    Element::new("w")
        .with_attribute("lemma", lemma)
        .with_attribute("morph", morph)
        .with_text(text)
}

fn transform(verse: &Element) -> VerseData {
    transform_verse(verse, &TransformOptions::default())
}

fn codes(lemma: &str) -> Vec<String> {
    extract_strongs(Some(lemma))
        .iter()
        .map(ToString::to_string)
        .collect()
}

/// Exodus 4:2-style verse with a ketiv/qere pair, an accent-only reading,
/// a commentary note, a maqqef and a closing sof pasuq.
fn apparatus_verse() -> Element {
    Element::new("verse")
        .with_element(w("c/559", "HC/Vqw3ms", "וַ/יֹּאמֶר"))
        .with_element(
            Element::new("note")
                .with_attribute("type", "variant")
                .with_element(Element::new("catchWord").with_text("וַיֹּאמֶר"))
                .with_element(
                    Element::new("rdg")
                        .with_attribute("type", "x-accent")
                        .with_element(w("c/559", "HC/Vqw3ms", "וַ/יֹּ֥אמֶר")),
                ),
        )
        .with_element(w("413", "HR/Sp3ms", "אֵלָיו ־"))
        .with_element(w("3068", "HNp", "יְהוָה"))
        .with_element(
            w("3318", "HVhi3ms", "הוצא")
                .with_attribute("type", "x-ketiv"),
        )
        .with_element(
            Element::new("note")
                .with_attribute("type", "variant")
                .with_element(Element::new("catchWord").with_text("הוצא"))
                .with_element(
                    Element::new("rdg")
                        .with_attribute("type", "x-qere")
                        .with_element(w("3318", "HVhv2ms", "הַיְצֵא")),
                ),
        )
        .with_element(
            Element::new("note")
                .with_text("Mss read otherwise")
                .with_element(Element::new("hi").with_text("BHS")),
        )
        .with_element(Element::new("seg").with_attribute("type", "x-pe").with_text("פ"))
        .with_element(
            Element::new("seg")
                .with_attribute("type", "x-sof-pasuq")
                .with_text("׃"),
        )
}

// =============================================================================
// TIER T0: VERSE RECORD SHAPE
// =============================================================================

mod t0_record_shape {
    use super::*;

    /// T0.1: Positions are a gap-free run starting at 1.
    #[test]
    fn positions_are_contiguous_from_one() {
        let verse = transform(&apparatus_verse());

        for (i, word) in verse.words.iter().enumerate() {
            assert_eq!(word.position as usize, i + 1);
        }
    }

    /// T0.2: Space-joining word texts reproduces the verse text.
    #[test]
    fn text_is_space_join_of_words() {
        let verse = transform(&apparatus_verse());
        let joined: Vec<&str> = verse.words.iter().map(|w| w.text.as_str()).collect();

        assert_eq!(verse.text, joined.join(" "));
    }

    /// T0.3: No word is the bare maqqef.
    #[test]
    fn no_maqqef_words() {
        let verse = transform(&apparatus_verse());

        assert!(verse.words.iter().all(|w| w.text != "\u{05BE}"));
    }

    /// T0.4: Words are never both ketiv and qere.
    #[test]
    fn variant_tag_is_exclusive() {
        let verse = transform(&apparatus_verse());
        let tagged: Vec<Option<Variant>> = verse.words.iter().map(|w| w.variant).collect();

        assert_eq!(
            tagged,
            vec![None, None, None, Some(Variant::Ketiv), Some(Variant::Qere)]
        );
    }

    /// T0.5: Serialized records follow the wire shape.
    #[test]
    fn json_wire_shape() {
        let verse = transform(&apparatus_verse());
        let json = serde_json::to_value(&verse).expect("json");

        assert!(json["text"].is_string());
        assert_eq!(json["words"][0]["position"], 1);
        assert_eq!(json["words"][0]["strongs"], serde_json::json!(["H559"]));
        assert_eq!(json["words"][3]["variant"], "ketiv");
        assert!(json.get("gematria").is_none());
    }
}

// =============================================================================
// TIER T1: LEXICAL EXTRACTION
// =============================================================================

mod t1_lexical_extraction {
    use super::*;

    /// T1.1: A single digit is a valid number.
    #[test]
    fn single_digit() {
        assert_eq!(codes("1"), vec!["H1"]);
    }

    /// T1.2: Disambiguation letters are not consumed.
    #[test]
    fn disambiguation_letter() {
        assert_eq!(codes("1471 a"), vec!["H1471"]);
    }

    /// T1.3: Grammatical prefixes yield nothing.
    #[test]
    fn prefix_letters() {
        assert!(codes("l").is_empty());
        assert!(codes("c/l").is_empty());
    }

    /// T1.4: Prefixed lemmas keep their number.
    #[test]
    fn prefixed_number() {
        assert_eq!(codes("b/990"), vec!["H990"]);
    }

    /// T1.5: A prefix-only word is flagged and carries no codes.
    #[test]
    fn prefix_only_word() {
        let verse = transform(
            &Element::new("verse")
                .with_element(w("l", "HR", "לְ"))
                .with_element(w("1732", "HNp", "דָוִד")),
        );

        assert!(verse.words[0].metadata.is_prefix_only);
        assert!(verse.words[0].strongs.is_none());
        assert!(!verse.words[1].metadata.is_prefix_only);
        assert_eq!(
            verse.words[1].strongs,
            Some(vec![StrongsNumber::hebrew(1732)])
        );
    }

    /// T1.6: Israel has ordinal 64 and standard 541.
    #[test]
    fn gematria_of_israel() {
        let value = word_gematria("יִשְׂרָאֵל");

        assert_eq!(value.ordinal, 64);
        assert_eq!(value.standard, 541);
    }

    /// T1.7: Gematria enrichment totals the final words.
    #[test]
    fn gematria_totals() {
        let verse = transform_verse(
            &apparatus_verse(),
            &TransformOptions {
                strip_cantillation: true,
                gematria: true,
            },
        );

        let expected: u32 = verse
            .words
            .iter()
            .map(|w| word_gematria(&w.text).standard)
            .sum();
        assert_eq!(verse.gematria.map(|g| g.standard), Some(expected));
        assert!(verse.words.iter().all(|w| w.metadata.gematria.is_some()));
    }
}

// =============================================================================
// TIER T2: ALTERNATE READINGS
// =============================================================================

mod t2_alternate_readings {
    use super::*;

    /// T2.1: A ketiv/qere pair gives exactly two annotated words.
    #[test]
    fn ketiv_qere_pair() {
        let verse = transform(&apparatus_verse());
        let pair: Vec<_> = verse
            .words
            .iter()
            .filter(|w| w.lemma.as_deref() == Some("3318"))
            .collect();

        assert_eq!(pair.len(), 2);
        assert_eq!(pair[0].variant, Some(Variant::Ketiv));
        assert_eq!(pair[1].variant, Some(Variant::Qere));
    }

    /// T2.2: An accent-only reading contributes zero words.
    #[test]
    fn accent_reading_is_silent() {
        let verse = transform(&apparatus_verse());
        let said = verse
            .words
            .iter()
            .filter(|w| w.lemma.as_deref() == Some("c/559"))
            .count();

        assert_eq!(said, 1);
    }

    /// T2.3: Words after a qere reading are untagged.
    #[test]
    fn qere_does_not_leak() {
        let verse = Element::new("verse")
            .with_element(
                Element::new("note").with_element(
                    Element::new("rdg")
                        .with_attribute("type", "x-qere")
                        .with_element(w("3318", "HVhv2ms", "הַיְצֵא")),
                ),
            )
            .with_element(w("854", "HR", "אִתָּךְ"));

        let out = transform(&verse);
        assert_eq!(out.words[0].variant, Some(Variant::Qere));
        assert_eq!(out.words[1].variant, None);
    }

    /// T2.4: Readings given as a list are all classified.
    #[test]
    fn reading_lists() {
        let json = serde_json::json!({
            "w": [
                { "$": { "lemma": "1", "morph": "HNcmsa" }, "_": "אָב" }
            ],
            "note": {
                "catchWord": "אב",
                "rdg": [
                    { "$": { "type": "x-accent" }, "w": { "$": { "lemma": "1" }, "_": "אָ֣ב" } },
                    { "$": { "type": "x-qere" }, "w": { "$": { "lemma": "2" }, "_": "אָח" } }
                ]
            }
        });

        let out = transform_node(&MarkupNode::from_json(&json), &TransformOptions::default());
        let lemmas: Vec<_> = out.words.iter().map(|w| w.lemma.as_deref()).collect();
        assert_eq!(lemmas, vec![Some("1"), Some("2")]);
        assert_eq!(out.words[1].variant, Some(Variant::Qere));
    }
}

// =============================================================================
// TIER T3: APPARATUS FILTERING
// =============================================================================

mod t3_apparatus_filtering {
    use super::*;

    /// T3.1: A sof pasuq segment contributes zero words.
    #[test]
    fn sof_pasuq_is_silent() {
        let with = transform(&apparatus_verse());
        assert!(with.words.iter().all(|w| w.text != "׃"));
    }

    /// T3.2: One fewer real word still round-trips the text.
    #[test]
    fn missing_word_still_round_trips() {
        let verse = Element::new("verse")
            .with_element(w("3068", "HNp", "יְהוָה"))
            .with_element(
                Element::new("seg")
                    .with_attribute("type", "x-sof-pasuq")
                    .with_text("׃"),
            );
        let out = transform(&verse);

        assert_eq!(out.words.len(), 1);
        assert_eq!(out.text, "יְהוָה");
    }

    /// T3.3: Bare footnote prose and paragraph markers are dropped.
    #[test]
    fn apparatus_noise_dropped() {
        let node = MarkupNode::List(vec![
            MarkupNode::Element(w("3068", "HNp", "יְהוָה")),
            MarkupNode::Text("Sebir: read".to_string()),
            MarkupNode::Text("ס".to_string()),
        ]);
        let out = transform_node(&node, &TransformOptions::default());

        assert_eq!(out.text, "יְהוָה");
    }

    /// T3.4: Unknown keys and attributes never fail the transform.
    #[test]
    fn unknown_markup_is_tolerated() {
        let json = serde_json::json!({
            "$": { "osisID": "Gen.1.1", "unknown": 7 },
            "milestone": { "$": { "type": "line" } },
            "w": { "$": { "lemma": "430", "extra": true }, "_": "אֱלֹהִים" },
            "weird": 42,
            "nothing": null
        });
        let out = transform_node(&MarkupNode::from_json(&json), &TransformOptions::default());

        assert_eq!(out.text, "אֱלֹהִים");
    }
}

// =============================================================================
// TIER T4: DOCUMENTS AND STORAGE
// =============================================================================

mod t4_documents_and_storage {
    use super::*;
    use mikra_core::{Importer, MikraError, VerseStore};
    use tempfile::tempdir;

    const DOCUMENT: &str = r#"<osis><osisText><div type="book" osisID="Exod"><chapter osisID="Exod.4">
<verse osisID="Exod.4.2">
  <w lemma="c/559" morph="HC/Vqw3ms">וַ/יֹּ֧אמֶר</w>
  <w lemma="413" morph="HR/Sp3ms">אֵלָ֛יו</w>
  <w lemma="3068" morph="HNp">יְהוָ֖ה</w>
  <seg type="x-sof-pasuq">׃</seg>
</verse>
</chapter></div></osisText></osis>"#;

    /// T4.1: A stored verse reads back identically.
    #[test]
    fn stored_verse_reads_back() {
        let temp = tempdir().expect("temp dir");
        let store = VerseStore::open(temp.path().join("mikra.redb")).expect("open");
        let options = TransformOptions::default();

        let imported = Importer::import_document(DOCUMENT.as_bytes(), &options).expect("import");
        Importer::import_into(&store, "wlc", DOCUMENT.as_bytes(), &options).expect("store");

        let reference = VerseRef::new("Exod", 4, 2);
        let stored = store.get_verse("wlc", &reference).expect("get");
        assert_eq!(stored, imported[0].verse);
    }

    /// T4.2: A missing verse surfaces one descriptive error.
    #[test]
    fn missing_verse_is_descriptive() {
        let temp = tempdir().expect("temp dir");
        let store = VerseStore::open(temp.path().join("mikra.redb")).expect("open");

        let err = store
            .get_verse("wlc", &VerseRef::new("Exod", 4, 99))
            .expect_err("missing");
        assert!(matches!(err, MikraError::VerseNotFound { .. }));
        assert!(err.to_string().contains("Exod 4:99"));
    }
}
