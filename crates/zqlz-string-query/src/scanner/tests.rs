//! Tests for the query template scanner

use super::*;
use pretty_assertions::assert_eq;

fn markers<'a>(sql: &'a str) -> Vec<Marker<'a>> {
    scan(sql, &StringQueryOptions::default())
        .unwrap()
        .into_iter()
        .filter_map(|span| match span {
            Span::Marker(marker) => Some(marker),
            Span::Literal(_) => None,
        })
        .collect()
}

fn targets<'a>(sql: &'a str) -> Vec<MarkerTarget<'a>> {
    markers(sql).into_iter().map(|marker| marker.target).collect()
}

mod span_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_no_markers_is_single_literal() {
        let sql = "select u from User u where u.id = 1";
        let spans = scan(sql, &StringQueryOptions::default()).unwrap();

        assert_eq!(spans, vec![Span::Literal(sql)]);
    }

    #[test]
    fn test_empty_template() {
        let spans = scan("", &StringQueryOptions::default()).unwrap();
        assert!(spans.is_empty());
    }

    #[test]
    fn test_spans_cover_template() {
        let sql = "where a = :a and b like %?1% order by c";
        let spans = scan(sql, &StringQueryOptions::default()).unwrap();

        assert_eq!(spans.len(), 5);
        assert_eq!(spans[0], Span::Literal("where a = "));
        assert_eq!(spans[2], Span::Literal(" and b like "));
        assert_eq!(spans[4], Span::Literal(" order by c"));

        let Span::Marker(like) = &spans[3] else {
            panic!("expected marker, got {:?}", spans[3]);
        };
        assert_eq!(like.raw(sql), "%?1%");
        assert_eq!(like.text, "?1");
        assert!(like.leading_wildcard);
        assert!(like.trailing_wildcard);
    }

    #[test]
    fn test_marker_at_end_of_template() {
        let sql = "where a = :a";
        let found = markers(sql);

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].start, 10);
        assert_eq!(found[0].end, sql.len());
    }
}

mod marker_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_named_and_positional_markers() {
        assert_eq!(
            targets("where a = :first and b = ?12"),
            vec![MarkerTarget::Named("first"), MarkerTarget::Positional(12)]
        );
    }

    #[test]
    fn test_unicode_named_markers() {
        assert_eq!(
            targets("where a in (:abonnés) and b in (:생일) and c = :ab1babc생일233"),
            vec![
                MarkerTarget::Named("abonnés"),
                MarkerTarget::Named("생일"),
                MarkerTarget::Named("ab1babc생일233"),
            ]
        );
    }

    #[test]
    fn test_combining_marks_are_word_characters() {
        // "e" followed by U+0301 COMBINING ACUTE ACCENT
        let sql = "where a = :cafe\u{301}";
        assert_eq!(targets(sql), vec![MarkerTarget::Named("cafe\u{301}")]);
    }

    #[test]
    fn test_bare_question_mark_is_literal() {
        assert!(markers("where a = ? and b = ?x").is_empty());
    }

    #[test]
    fn test_colon_without_identifier_is_literal() {
        assert!(markers("where a = : and b = ':'").is_empty());
    }

    #[test]
    fn test_cast_is_not_a_marker() {
        assert_eq!(
            targets("where a::text = :value::text"),
            vec![MarkerTarget::Named("value")]
        );
    }

    #[test]
    fn test_position_zero_is_rejected() {
        let err = scan("where a = ?0", &StringQueryOptions::default()).unwrap_err();
        assert_eq!(err, StringQueryError::InvalidPosition { offset: 10 });
    }

    #[test]
    fn test_position_overflow_is_rejected() {
        let sql = "where a = ?99999999999999999999999999";
        let err = scan(sql, &StringQueryOptions::default()).unwrap_err();
        assert_eq!(err, StringQueryError::InvalidPosition { offset: 10 });
    }
}

mod expression_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_expression_markers() {
        assert_eq!(
            targets("where a in :#{#bs} and b = ?#{#c.name}"),
            vec![
                MarkerTarget::NamedExpression("#bs"),
                MarkerTarget::PositionalExpression("#c.name"),
            ]
        );
    }

    #[test]
    fn test_nested_braces_in_expression() {
        let sql = "where a = :#{ {1, 2}.size() } and b = :b";
        assert_eq!(
            targets(sql),
            vec![
                MarkerTarget::NamedExpression(" {1, 2}.size() "),
                MarkerTarget::Named("b"),
            ]
        );
    }

    #[test]
    fn test_expression_payload_is_not_rescanned() {
        assert_eq!(
            targets("where a = :#{#map[':key']}"),
            vec![MarkerTarget::NamedExpression("#map[':key']")]
        );
    }

    #[test]
    fn test_unterminated_expression() {
        let err = scan("where a = :#{#foo", &StringQueryOptions::default()).unwrap_err();
        assert_eq!(err, StringQueryError::MalformedExpression { offset: 10 });
    }

    #[test]
    fn test_unterminated_nested_expression() {
        let err = scan("where a = ?#{ {x }", &StringQueryOptions::default()).unwrap_err();
        assert_eq!(err, StringQueryError::MalformedExpression { offset: 10 });
    }

    #[test]
    fn test_unterminated_expression_with_wildcard_reports_marker_offset() {
        let err = scan("where a like %:#{#foo", &StringQueryOptions::default()).unwrap_err();
        assert_eq!(err, StringQueryError::MalformedExpression { offset: 14 });
    }
}

mod context_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_like_context_is_case_insensitive() {
        let found = markers("where a LIKE :a or b like ?1 or c LiKe %:c");

        assert!(found.iter().all(|m| m.context == MarkerContext::Like));
    }

    #[test]
    fn test_in_context_with_and_without_parentheses() {
        let found = markers("where a in :a and b IN (:b) and c in(  ?1 )");

        assert_eq!(found.len(), 3);
        assert!(found.iter().all(|m| m.context == MarkerContext::In));
    }

    #[test]
    fn test_not_in_is_in_context() {
        let found = markers("where a not in (:excluded)");
        assert_eq!(found[0].context, MarkerContext::In);
    }

    #[test]
    fn test_comparison_is_plain_context() {
        let found = markers("where a > ?1 and b = :b and c <> :c");
        assert!(found.iter().all(|m| m.context == MarkerContext::Plain));
    }

    #[test]
    fn test_keyword_needs_word_boundary() {
        let found = markers("where unlike :a and join_in :b");

        assert_eq!(found[0].context, MarkerContext::Plain);
        assert_eq!(found[1].context, MarkerContext::Plain);
    }

    #[test]
    fn test_keyword_on_previous_line() {
        let found = markers("where a like\n\t%:a");
        assert_eq!(found[0].context, MarkerContext::Like);
    }

    #[test]
    fn test_parenthesis_without_in_is_plain() {
        let found = markers("where lower(:a) = b and a like (:b)");

        assert_eq!(found[0].context, MarkerContext::Plain);
        assert_eq!(found[1].context, MarkerContext::Plain);
    }

    #[test]
    fn test_second_list_element_is_plain() {
        let found = markers("where a in (:a, :b)");

        assert_eq!(found[0].context, MarkerContext::In);
        assert_eq!(found[1].context, MarkerContext::Plain);
    }
}

mod literal_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_markers_in_quotes_ignored() {
        assert_eq!(
            targets("where a = ':not_a_param' and b = \"?1\" and c = :c"),
            vec![MarkerTarget::Named("c")]
        );
    }

    #[test]
    fn test_doubled_quote_escape() {
        assert_eq!(
            targets("where a = 'it''s :nope' and b = :b"),
            vec![MarkerTarget::Named("b")]
        );
    }

    #[test]
    fn test_unterminated_quote_runs_to_end() {
        assert!(markers("where a = 'open :a").is_empty());
    }

    #[test]
    fn test_comments_scanned_by_default() {
        assert_eq!(
            targets("where a = :a -- :b"),
            vec![MarkerTarget::Named("a"), MarkerTarget::Named("b")]
        );
    }

    #[test]
    fn test_comments_skipped_when_enabled() {
        let options = StringQueryOptions::new().with_skip_comments(true);
        let sql = "where a = :a -- :line\n and /* :block */ b = :b";
        let spans = scan(sql, &options).unwrap();

        let names: Vec<_> = spans
            .iter()
            .filter_map(|span| match span {
                Span::Marker(marker) => Some(marker.text),
                Span::Literal(_) => None,
            })
            .collect();
        assert_eq!(names, vec![":a", ":b"]);
    }
}

mod escape_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_escape_clause_detected_after_like_marker() {
        let found = markers("where a LIKE %:word% ESCAPE '~' or b like :b escape '\\'");

        assert_eq!(found[0].escape, Some('~'));
        assert_eq!(found[1].escape, Some('\\'));
    }

    #[test]
    fn test_escape_clause_ignored_outside_like() {
        let found = markers("where a = :a escape '~'");
        assert_eq!(found[0].escape, None);
    }

    #[test]
    fn test_escape_detection_can_be_disabled() {
        let options = StringQueryOptions::new().with_detect_escape_clause(false);
        let spans = scan("where a like :a escape '~'", &options).unwrap();

        let Span::Marker(marker) = &spans[1] else {
            panic!("expected marker, got {:?}", spans[1]);
        };
        assert_eq!(marker.escape, None);
    }

    #[test]
    fn test_escaped_identifier_is_not_escape_clause() {
        let found = markers("where a like :a escaped '~'");
        assert_eq!(found[0].escape, None);
    }
}

mod mask_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_mask_replaces_quoted_text() {
        let masked = mask_opaque(
            "select 'select new X()' from A a",
            &StringQueryOptions::default(),
        );
        assert_eq!(masked, "select   from A a");
    }

    #[test]
    fn test_mask_keeps_comments_by_default() {
        let sql = "select a -- from B b\nfrom A a";
        assert_eq!(mask_opaque(sql, &StringQueryOptions::default()), sql);
    }

    #[test]
    fn test_mask_comments_when_skipped() {
        let options = StringQueryOptions::new().with_skip_comments(true);
        assert_eq!(
            mask_opaque("select a /* x */ from A a", &options),
            "select a   from A a"
        );
    }
}

#[test]
fn test_is_word_char() {
    assert!(is_word_char('a'));
    assert!(is_word_char('_'));
    assert!(is_word_char('7'));
    assert!(is_word_char('ø'));
    assert!(is_word_char('생'));
    assert!(is_word_char('\u{301}'));
    assert!(!is_word_char(' '));
    assert!(!is_word_char('%'));
    assert!(!is_word_char('('));
}
