mod common;

use common::run;

fn static_errors(source: &str) -> Vec<String> {
    let outcome = run(source);
    assert!(
        outcome.runtime_errors.is_empty(),
        "resolver errors must stop execution"
    );
    outcome.static_errors
}

#[test]
fn reading_a_local_in_its_own_initializer() {
    let outcome = run("var a = 1; { var a = a; } print \"ran\";");

    assert_eq!(
        outcome.static_errors,
        vec!["[line 1] Error at 'a': Can't read local variable in its own initializer."]
    );
    assert_eq!(outcome.stdout, "", "no runtime phase may execute");
    assert_eq!(outcome.exit_code, 65);
}

#[test]
fn global_self_reference_is_allowed() {
    let outcome = run("var a = 1; var a = a; print a;");
    assert!(outcome.static_errors.is_empty());
    assert_eq!(outcome.stdout, "1\n");
}

#[test]
fn top_level_return() {
    assert_eq!(
        static_errors("return 1;"),
        vec!["[line 1] Error at 'return': Can't return from top-level code."]
    );
}

#[test]
fn this_outside_a_class() {
    assert_eq!(
        static_errors("print this;"),
        vec!["[line 1] Error at 'this': Can't use 'this' outside of a class."]
    );
    assert_eq!(
        static_errors("fn f() { return this; }"),
        vec!["[line 1] Error at 'this': Can't use 'this' outside of a class."]
    );
}

#[test]
fn returning_a_value_from_an_initializer() {
    assert_eq!(
        static_errors("class C { init() { return 42; } }"),
        vec!["[line 1] Error at 'return': Can't return value from an initializer."]
    );
}

#[test]
fn bare_return_in_initializer_is_fine() {
    assert!(static_errors("class C { init() { return; } }").is_empty());
}

#[test]
fn break_and_continue_need_a_loop() {
    assert_eq!(
        static_errors("break;"),
        vec!["[line 1] Error at 'break': Can't use 'break' outside of a loop."]
    );
    assert_eq!(
        static_errors("while true { fn f() { continue; } }"),
        vec!["[line 1] Error at 'continue': Can't use 'continue' outside of a loop."]
    );
}

#[test]
fn labels_must_match_an_enclosing_loop() {
    assert_eq!(
        static_errors("a: while true { break b; }"),
        vec!["[line 1] Error at 'b': No enclosing loop labeled 'b'."]
    );
}

#[test]
fn labels_are_unique_within_nested_loops() {
    assert_eq!(
        static_errors("a: while true { a: while true { break a; } }"),
        vec!["[line 1] Error at 'a': Label 'a' is already used by an enclosing loop."]
    );
    // Sibling loops may reuse a label.
    assert!(static_errors("a: while false { } a: while false { }").is_empty());
}

#[test]
fn duplicate_local_declaration() {
    assert_eq!(
        static_errors("{ var a = 1; var a = 2; }"),
        vec!["[line 1] Error at 'a': Already a variable with this name in this scope."]
    );
}

#[test]
fn all_errors_are_reported_in_one_pass() {
    let errors = static_errors("return 1;\nprint this;\nbreak;");
    assert_eq!(errors.len(), 3);
    assert!(errors[0].starts_with("[line 1]"));
    assert!(errors[1].starts_with("[line 2]"));
    assert!(errors[2].starts_with("[line 3]"));
}

#[test]
fn parse_errors_suppress_resolution() {
    let errors = static_errors("return 1; print ;");
    assert_eq!(errors, vec!["[line 1] Error at ';': Expect expression."]);
}
