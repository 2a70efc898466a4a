use golox::ast::{Expr, Stmt};
use golox::ast_printer::AstPrinter;
use golox::parser::Parser;
use golox::reporter::{CollectingReporter, Reporter};
use golox::scanner::Scanner;

fn parse(source: &str) -> (Vec<Stmt>, CollectingReporter) {
    let mut reporter = CollectingReporter::new();
    let tokens = Scanner::new(source.as_bytes()).scan_tokens(&mut reporter);
    let statements = Parser::new(tokens, &mut reporter).parse();
    (statements, reporter)
}

fn printed(source: &str) -> Vec<String> {
    let (statements, reporter) = parse(source);
    assert!(!reporter.had_error(), "{:?}", reporter.static_errors);
    statements.iter().map(|s| AstPrinter.print_stmt(s)).collect()
}

#[test]
fn precedence_layers() {
    assert_eq!(printed("print 1+2*3;"), vec!["(print (+ 1 (* 2 3)))"]);
    assert_eq!(
        printed("print -a == b or c and !d;"),
        vec!["(print (or (== (- a) b) (and c (! d))))"]
    );
}

#[test]
fn ternary_is_right_associative() {
    assert_eq!(
        printed("x = a ? b : c ? d : e;"),
        vec!["(; (= x (?: a b (?: c d e))))"]
    );
}

#[test]
fn comma_does_not_swallow_call_arguments() {
    assert_eq!(printed("f(a, b), g();"), vec!["(; (, (call f a b) (call g)))"]);
}

#[test]
fn property_assignment_becomes_set() {
    assert_eq!(printed("a.b.c = 1;"), vec!["(; (= (. (. a b) c) 1))"]);
}

#[test]
fn for_desugars_into_scoped_while() {
    assert_eq!(
        printed("for (var i = 0; i < 3; i = i + 1) { print i; }"),
        vec!["(for (var i 0) (while (< i 3) (block (print i)) (= i (+ i 1))))"]
    );
    assert_eq!(
        printed("for ;; { break; }"),
        vec!["(for (while true (block (break))))"]
    );
}

#[test]
fn headers_may_omit_parentheses() {
    assert_eq!(
        printed("while x < 3 { x = x + 1; }"),
        vec!["(while (< x 3) (block (; (= x (+ x 1)))))"]
    );
    assert_eq!(
        printed("if a { } else if b { } else { }"),
        vec!["(if a (block) (if b (block) (block)))"]
    );
}

#[test]
fn labeled_loops_and_jumps() {
    assert_eq!(
        printed("outer: while true { break outer; continue; }"),
        vec!["(while outer: true (block (break outer) (continue)))"]
    );
}

#[test]
fn classes_and_functions() {
    assert_eq!(
        printed("class C { init(a) { return; } get() { return this; } }"),
        vec!["(class C (method init (a) (block (return))) (method get () (block (return this))))"]
    );
    assert_eq!(
        printed("fn add(a, b) { return a + b; }"),
        vec!["(fn add (a b) (block (return (+ a b))))"]
    );
}

#[test]
fn body_must_be_a_block() {
    let (_, reporter) = parse("if (x) print 1;");
    assert_eq!(
        reporter.static_errors,
        vec!["[line 1] Error at 'print': Expect block."]
    );
}

#[test]
fn invalid_assignment_target_is_reported_without_recovery() {
    let (statements, reporter) = parse("a + b = c; print 1;");
    assert_eq!(
        reporter.static_errors,
        vec!["[line 1] Error at '=': Invalid assignment target."]
    );
    assert_eq!(statements.len(), 2);
}

#[test]
fn panic_mode_recovers_at_statement_boundaries() {
    let (statements, reporter) = parse("var = 1;\nprint 2;\nvar x = ;\nprint 3;");

    assert_eq!(
        reporter.static_errors,
        vec![
            "[line 1] Error at '=': Expect variable name.",
            "[line 3] Error at ';': Expect expression.",
        ]
    );
    assert_eq!(statements.len(), 2);
    assert!(statements.iter().all(|s| matches!(s, Stmt::Print(_))));
}

#[test]
fn error_at_end_of_input() {
    let (_, reporter) = parse("print 1");
    assert_eq!(
        reporter.static_errors,
        vec!["[line 1] Error at end: Expect ';' after value."]
    );
}

#[test]
fn too_many_arguments_is_reported_but_parsed() {
    let args: Vec<String> = (0..256).map(|i| i.to_string()).collect();
    let source = format!("f({});", args.join(", "));
    let (statements, reporter) = parse(&source);

    assert_eq!(reporter.static_errors.len(), 1);
    assert!(reporter.static_errors[0].ends_with("Can't have more than 255 arguments."));

    match &statements[0] {
        Stmt::Expression(Expr::Call { arguments, .. }) => assert_eq!(arguments.len(), 256),
        other => panic!("expected a call, got {:?}", other),
    }
}

#[test]
fn identical_references_get_distinct_ids() {
    let (statements, _) = parse("x; x;");
    let ids: Vec<_> = statements
        .iter()
        .map(|s| match s {
            Stmt::Expression(Expr::Variable { id, .. }) => *id,
            other => panic!("expected variable, got {:?}", other),
        })
        .collect();

    assert_ne!(ids[0], ids[1]);
}
