use serde_json::json;

use super::*;
use crate::operator::Operator::*;

/// list of numbers: ListSize is its length, PortNumber each of its items
enum Numbers {}

impl Target for Numbers {
    type Input = [i64];
    const NAME: &'static str = "numbers";
    const KINDS: &'static [RuleKind] = &[RuleKind::ListSize, RuleKind::PortNumber];

    fn measure<F>(input: &[i64], kind: RuleKind, mut check: F) -> Result<(), Rejection>
    where
        F: FnMut(i64) -> Result<(), Rejection>,
    {
        match kind {
            RuleKind::ListSize => check(len_subject(input.len())),
            RuleKind::PortNumber => input.iter().try_for_each(|v| check(*v)),
            _ => Ok(()),
        }
    }
}

fn rule(kind: RuleKind, operator: Operator, operand: i64) -> Rule {
    Rule::new(kind, operator, operand).unwrap()
}

#[test]
fn test_rule_check() {
    let r = rule(RuleKind::MaskBitsSize, Gt, 20);
    assert_eq!(r.check(24), Ok(()));

    let err = r.check(19).unwrap_err();
    assert_eq!(
        err,
        Rejection::Rule {
            kind: RuleKind::MaskBitsSize,
            operator: Gt,
            operand: 20,
            actual: 19,
        }
    );
    assert_eq!(
        err.to_string(),
        "InvalidMaskSize: mask size must be Gt 20, got 19"
    );
}

#[test]
fn test_rule_from_config() {
    let r: Rule = serde_json::from_value(json!({
        "name": "PortNumber", "operator": "Ge", "value": 1024,
    }))
    .unwrap();
    assert_eq!((r.kind(), r.operator(), r.operand()), (RuleKind::PortNumber, Ge, 1024));

    // int-or-string operand
    let r: Rule = serde_json::from_value(json!({
        "name": "LabelValues", "operator": "Equals", "key": "env", "value": "2",
    }))
    .unwrap();
    assert_eq!(r.operand(), 2);
    assert_eq!(r.key(), Some("env"));
}

#[test]
fn test_rule_config_errors() {
    let err = serde_json::from_value::<Rule>(json!({
        "name": "LabelCount", "operator": "Exists", "value": 1,
    }))
    .unwrap_err();
    assert!(err.to_string().contains("UnsupportedOperator"), "{err}");

    let err = serde_json::from_value::<Rule>(json!({
        "name": "ListSize", "operator": "Equals", "value": "two",
    }))
    .unwrap_err();
    assert!(err.to_string().contains("not a non-negative integer"), "{err}");

    assert!(serde_json::from_value::<Rule>(json!({
        "name": "MaskSize", "operator": "Equals", "value": 1,
    }))
    .is_err());

    assert_eq!(
        Rule::new(RuleKind::ListSize, Equals, -1),
        Err(Error::InvalidOperand {
            kind: RuleKind::ListSize,
            value: "-1".into()
        })
    );
}

#[test]
fn test_rule_list_is_and() {
    let list = RuleList::<Numbers>::new(vec![
        rule(RuleKind::ListSize, Le, 3),
        rule(RuleKind::PortNumber, Ge, 1024),
        rule(RuleKind::PortNumber, Lt, 2048),
    ])
    .unwrap();

    assert_eq!(list.check(&[1024, 2000]), Ok(()));
    assert_eq!(list.check(&[]), Ok(()));

    // first failing rule, first failing item
    assert_eq!(
        list.check(&[1, 2, 3, 4]),
        Err(rule(RuleKind::ListSize, Le, 3).check(4).unwrap_err())
    );
    assert_eq!(
        list.check(&[1500, 80, 8080]),
        Err(rule(RuleKind::PortNumber, Ge, 1024).check(80).unwrap_err())
    );
    assert_eq!(
        list.check(&[1500, 8080]),
        Err(rule(RuleKind::PortNumber, Lt, 2048).check(8080).unwrap_err())
    );
}

#[test]
fn test_empty_rule_list() {
    let list = RuleList::<Numbers>::default();
    assert!(list.is_empty());
    assert_eq!(list.check(&[-1, i64::MAX]), Ok(()));
}

#[test]
fn test_rule_list_rejects_foreign_kinds() {
    let err = serde_json::from_value::<RuleList<Numbers>>(json!([
        {"name": "ListSize", "operator": "Equals", "value": 1},
        {"name": "LabelCount", "operator": "Equals", "value": 1},
    ]))
    .unwrap_err();
    assert!(
        err.to_string().contains("rule LabelCount cannot be attached to numbers"),
        "{err}"
    );
}
