//! Tests for wrapper generation

use indoc::indoc;
use pretty_assertions::assert_eq;

use crate::descriptor::{DescriptorBuilder, ParameterDescriptor, RawParameterRow};
use crate::generator::*;
use crate::type_map::TypeMappingTable;

fn build(procedure: &str, rows: &[RawParameterRow]) -> Vec<ParameterDescriptor> {
    let table = TypeMappingTable::bundled().unwrap();
    DescriptorBuilder::new(&table)
        .build_all(procedure, rows)
        .unwrap()
}

fn get_user_params() -> Vec<ParameterDescriptor> {
    build(
        "GetUser",
        &[
            RawParameterRow::new("@id", "int", 1)
                .with_length(4)
                .with_precision(10, 0),
            RawParameterRow::new("@name", "nvarchar", 2)
                .with_length(50)
                .output(),
        ],
    )
}

#[test]
fn test_generate_get_user() {
    let generator = WrapperGenerator::new().unwrap();
    let text = generator
        .generate("dbo", "GetUser", &get_user_params())
        .unwrap();

    let expected = indoc! {r#"
        /**
         * @function GetUser
         * @param {number} id - int (len and precision: 4:10)
         * @param {string} name - nvarchar (len and precision: 50:25) OUTPUT
         * @param done {function} callback(err, result, outputs)
         */
        module.exports.dbo.GetUser = (id, done) => {
          const request = new sql.Request()
            .input('id', sql.Int, id)
            .output('name', sql.NVarChar(50))
          request.execute('dbo.GetUser')
            .then(result => {
              const outputs = Object.keys(result.output || {}).map(key => ({ [key]: result.output[key] }))
              done(null, result, outputs)
            })
            .catch(err => {
              done(err, null)
            })
        }
    "#};

    assert_eq!(text, expected);
}

#[test]
fn test_generated_text_has_no_blank_lines() {
    let generator = WrapperGenerator::new().unwrap();
    let text = generator.generate("dbo", "Ping", &[]).unwrap();
    assert!(!text.starts_with('\n'));
    assert!(text.lines().all(|line| !line.trim().is_empty()));
    assert!(text.ends_with("}\n"));
    assert!(!text.ends_with("\n\n"));
}

#[test]
fn test_no_parameters() {
    let generator = WrapperGenerator::new().unwrap();
    let text = generator.generate("dbo", "Ping", &[]).unwrap();
    assert!(text.contains("module.exports.dbo.Ping = (done) => {"));
    assert!(text.contains(" * @param done {function} callback(err, result)\n"));
    assert!(!text.contains(".input("));
    assert!(!text.contains(".output("));
}

#[test]
fn test_signature_follows_ordinal_order() {
    let params = build(
        "Move",
        &[
            RawParameterRow::new("@third", "int", 3),
            RawParameterRow::new("@first", "int", 1),
            RawParameterRow::new("@second", "int", 2),
        ],
    );
    let generator = WrapperGenerator::new().unwrap();
    let text = generator.generate("dbo", "Move", &params).unwrap();
    assert!(text.contains("module.exports.dbo.Move = (first, second, third, done) => {"));

    let first = text.find(".input('first'").unwrap();
    let second = text.find(".input('second'").unwrap();
    let third = text.find(".input('third'").unwrap();
    assert!(first < second && second < third);
}

#[test]
fn test_outputs_are_bound_but_not_in_signature() {
    let params = build(
        "Split",
        &[
            RawParameterRow::new("@total", "int", 1).output(),
            RawParameterRow::new("@input", "varchar", 2).with_length(10),
            RawParameterRow::new("@remainder", "decimal", 3)
                .with_precision(9, 2)
                .output(),
        ],
    );
    let generator = WrapperGenerator::new().unwrap();
    let text = generator.generate("dbo", "Split", &params).unwrap();

    assert!(text.contains("module.exports.dbo.Split = (input, done) => {"));
    assert!(text.contains("    .input('input', sql.VarChar(10), input)\n"));
    assert!(text.contains("    .output('total', sql.Int)\n"));
    assert!(text.contains("    .output('remainder', sql.Decimal(9, 2))\n"));
    assert!(text.find(".output('total'").unwrap() < text.find(".output('remainder'").unwrap());
    assert!(text.contains(" * @param {number} total - int (len and precision: 0:10) OUTPUT\n"));
}

#[test]
fn test_inputs_are_bound_before_outputs() {
    let generator = WrapperGenerator::new().unwrap();
    let text = generator
        .generate("dbo", "GetUser", &get_user_params())
        .unwrap();
    assert!(text.find(".input(").unwrap() < text.find(".output(").unwrap());
}

#[test]
fn test_generation_is_deterministic() {
    let generator = WrapperGenerator::new().unwrap();
    let first = generator
        .generate("dbo", "GetUser", &get_user_params())
        .unwrap();
    let second = WrapperGenerator::new()
        .unwrap()
        .generate("dbo", "GetUser", &get_user_params())
        .unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_procedure_names_needing_brackets() {
    let generator = WrapperGenerator::new().unwrap();
    let text = generator.generate("dbo", "Get-User's", &[]).unwrap();
    assert!(text.contains("module.exports.dbo['Get-User\\'s'] = (done) => {"));
    assert!(text.contains("request.execute('dbo.Get-User\\'s')"));
}

#[test]
fn test_generate_wrapper_keeps_metadata() {
    let generator = WrapperGenerator::new().unwrap();
    let wrapper = generator
        .generate_wrapper("dbo", "GetUser", get_user_params())
        .unwrap();
    assert_eq!(wrapper.schema, "dbo");
    assert_eq!(wrapper.procedure, "GetUser");
    assert_eq!(wrapper.parameters.len(), 2);
    assert!(wrapper.text.contains("@function GetUser"));
}

#[test]
fn test_member_access() {
    assert_eq!(member_access("dbo"), ".dbo");
    assert_eq!(member_access("$scope_1"), ".$scope_1");
    assert_eq!(member_access("my schema"), "['my schema']");
    assert_eq!(member_access("9lives"), "['9lives']");
}

#[test]
fn test_strip_blank_lines() {
    assert_eq!(strip_blank_lines("\n  \na\n\t\nb"), "a\nb\n");
}

#[test]
fn test_comment_terminator_in_names_stays_inside_doc_block() {
    let generator = WrapperGenerator::new().unwrap();
    let text = generator.generate("dbo", "Get*/User", &[]).unwrap();

    let (doc, code) = text.split_once("module.exports").unwrap();
    assert!(doc.contains(" * @function Get*\\/User\n"));
    assert_eq!(doc.matches("*/").count(), 1);
    assert!(doc.ends_with(" */\n"));
    assert!(code.starts_with(".dbo['Get*/User'] = (done) => {"));
    assert!(text.contains("request.execute('dbo.Get*/User')"));
}

#[test]
fn test_doc_text() {
    assert_eq!(doc_text("GetUser"), "GetUser");
    assert_eq!(doc_text("a*/b*/"), "a*\\/b*\\/");
}
