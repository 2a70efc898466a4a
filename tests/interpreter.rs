mod common;

use std::io::Cursor;

use common::{output_of, run, SharedBuffer};
use golox::lox::{Lox, BANNER, PROMPT};
use golox::reporter::CollectingReporter;

#[test]
fn prints_a_string() {
    assert_eq!(output_of("print \"hi\";"), "hi\n");
}

#[test]
fn arithmetic_precedence() {
    assert_eq!(output_of("print 1+2*3;"), "7\n");
}

#[test]
fn globals() {
    assert_eq!(output_of("var a=1; var b=2; print a+b;"), "3\n");
}

#[test]
fn recursive_fibonacci() {
    let source = "fn fib(n){ if (n<2) { return n; } return fib(n-1)+fib(n-2); }
                  print fib(10);";
    assert_eq!(output_of(source), "55\n");
}

#[test]
fn method_call() {
    let source = "class Greeter { greet(name){ print \"hi \" + name; } }
                  Greeter().greet(\"world\");";
    assert_eq!(output_of(source), "hi world\n");
}

#[test]
fn counting_for_loop() {
    assert_eq!(
        output_of("for (var i=0; i<3; i=i+1) { print i; }"),
        "0\n1\n2\n"
    );
}

#[test]
fn closures_bind_lexically() {
    let source = "var a=1; { fn f(){print a;} var a=2; f(); }";
    assert_eq!(output_of(source), "1\n");
}

#[test]
fn closures_capture_their_environment() {
    let source = "fn make(){var i=0; fn inc(){i = i+1; return i;} return inc;}
                  var c = make(); print c(); print c();";
    assert_eq!(output_of(source), "1\n2\n");
}

#[test]
fn initializer_early_return_yields_instance() {
    assert_eq!(
        output_of("class C { init(){return;}} print C();"),
        "C instance\n"
    );
}

#[test]
fn initializer_receives_arguments() {
    let source = "class P { init(x) { print x; } show() { print this; } }
                  var p = P(5); p.show(); print p.init(6) == p;";
    assert_eq!(output_of(source), "5\nP instance\n6\ntrue\n");
}

#[test]
fn logical_operators_short_circuit() {
    assert_eq!(output_of("print nil or \"a\";"), "a\n");
    assert_eq!(output_of("print false and crash();"), "false\n");
    assert_eq!(output_of("print 1 and 2;"), "2\n");
}

#[test]
fn equality() {
    assert_eq!(output_of("print 1 == 1.0;"), "true\n");
    assert_eq!(output_of("print \"1\" == 1;"), "false\n");
    assert_eq!(output_of("print nil == false;"), "false\n");
    assert_eq!(output_of("print \"ab\" == \"a\" + \"b\";"), "true\n");
}

#[test]
fn number_formatting() {
    assert_eq!(output_of("print 2;"), "2\n");
    assert_eq!(output_of("print 2.5;"), "2.5\n");
    assert_eq!(output_of("print 7 / 2;"), "3.5\n");
    assert_eq!(output_of("print -3;"), "-3\n");
}

#[test]
fn ternary_and_comma() {
    assert_eq!(output_of("print 1 < 2 ? \"yes\" : \"no\";"), "yes\n");
    assert_eq!(output_of("var a = 0; print (a = 1, a + 1);"), "2\n");
}

#[test]
fn callables_print_their_names() {
    assert_eq!(
        output_of("fn f() {} class K {} print f; print K; print clock;"),
        "<fn f>\nK\n<native fn clock>\n"
    );
}

#[test]
fn break_and_continue() {
    let source = "var i = 0;
                  while true {
                      i = i + 1;
                      if i == 2 { continue; }
                      if i > 4 { break; }
                      print i;
                  }";
    assert_eq!(output_of(source), "1\n3\n4\n");
}

#[test]
fn continue_in_for_runs_the_increment() {
    let source = "for (var i = 0; i < 4; i = i + 1) { if i == 1 { continue; } print i; }";
    assert_eq!(output_of(source), "0\n2\n3\n");
}

#[test]
fn labeled_jumps_target_the_outer_loop() {
    let source = "outer: for (var i = 0; i < 3; i = i + 1) {
                      for (var j = 0; j < 3; j = j + 1) {
                          if j == 1 { continue outer; }
                          if i == 2 { break outer; }
                          print i * 10 + j;
                      }
                  }
                  print \"done\";";
    assert_eq!(output_of(source), "0\n10\ndone\n");
}

#[test]
fn return_inside_loop_leaves_the_function() {
    let source = "fn first() { while true { return 1; } } print first();";
    assert_eq!(output_of(source), "1\n");
}

#[test]
fn arrays() {
    let source = "var a = array(1, \"two\");
                  append(a, nil, 4);
                  print a;
                  print len(a);
                  print len(array());";
    assert_eq!(output_of(source), "[1, two, nil, 4]\n4\n0\n");
}

#[test]
fn arity_mismatch() {
    let outcome = run("fn f(a) {} f();");
    assert_eq!(
        outcome.runtime_errors,
        vec!["[line 1] Error: Expected 1 arguments but got 0."]
    );

    let outcome = run("fn f(a) {} f(1, 2);");
    assert_eq!(
        outcome.runtime_errors,
        vec!["[line 1] Error: Expected 1 arguments but got 2."]
    );
}

#[test]
fn runtime_type_errors() {
    let cases = [
        ("print -\"a\";", "Operand must be a number."),
        ("print 1 < \"a\";", "Operands must be numbers."),
        ("print 1 + nil;", "Operands must be either numbers or strings."),
        ("\"f\"();", "Can only call functions and classes."),
        ("print undefined;", "Undefined variable 'undefined'."),
        ("undefined = 1;", "Undefined variable 'undefined'."),
        ("class C {} print C().missing;", "Undefined property 'missing'."),
        ("print 3.field;", "Only instances have properties."),
        ("len(1);", "len() expects an array, got number."),
    ];

    for (source, message) in cases {
        let outcome = run(source);
        assert_eq!(
            outcome.runtime_errors,
            vec![format!("[line 1] Error: {}", message)],
            "source: {}",
            source
        );
        assert_eq!(outcome.exit_code, 70, "source: {}", source);
    }
}

#[test]
fn runtime_error_stops_the_program() {
    let outcome = run("print 1;\nprint nil + 1;\nprint 2;");

    assert_eq!(outcome.stdout, "1\n");
    assert_eq!(
        outcome.runtime_errors,
        vec!["[line 2] Error: Operands must be either numbers or strings."]
    );
    assert_eq!(outcome.exit_code, 70);
}

#[test]
fn static_errors_exit_with_65() {
    let outcome = run("print \"unterminated");
    assert_eq!(outcome.exit_code, 65);
    assert!(outcome.runtime_errors.is_empty());

    assert_eq!(run("print 1;").exit_code, 0);
}

fn repl(input: &str) -> (String, String, Vec<String>) {
    let out = SharedBuffer::default();
    let mut lox = Lox::with_output(CollectingReporter::new(), Box::new(out.clone()));
    let mut console = Vec::new();

    lox.run_prompt(Cursor::new(input.as_bytes()), &mut console)
        .expect("in-memory I/O cannot fail");

    (
        String::from_utf8(console).expect("console is UTF-8"),
        out.contents(),
        lox.reporter().messages(),
    )
}

#[test]
fn repl_keeps_state_between_lines() {
    let (console, stdout, errors) = repl("var a = 20;\nfn twice(x) { return x * 2; }\nprint twice(a);\n");

    assert!(console.starts_with(&format!("{}\n{}", BANNER, PROMPT)));
    assert_eq!(console.matches(PROMPT).count(), 4);
    assert_eq!(stdout, "40\n");
    assert!(errors.is_empty());
}

#[test]
fn repl_recovers_after_errors() {
    let (_, stdout, errors) = repl("print ;\nprint nope;\nprint \"still here\";\n");

    assert_eq!(stdout, "still here\n");
    assert_eq!(
        errors,
        vec![
            "[line 1] Error at ';': Expect expression.",
            "[line 1] Error: Undefined variable 'nope'.",
        ]
    );
}

#[test]
fn unbounded_recursion_is_a_runtime_error() {
    let outcome = run("fn f() { f(); } f();");

    assert_eq!(
        outcome.runtime_errors,
        vec!["[line 1] Error: Stack overflow."]
    );
    assert_eq!(outcome.exit_code, 70);
}

#[test]
fn deep_but_bounded_recursion_completes() {
    let source = "fn d(n) { if n == 0 { return 0; } return 1 + d(n - 1); } print d(900);";
    assert_eq!(output_of(source), "900\n");
}

#[test]
fn self_containing_array_prints_finitely() {
    let source = "var a = array(1); append(a, a); print a; print len(a);";
    assert_eq!(output_of(source), "[1, [...]]\n2\n");
}

#[test]
fn repl_forgets_top_level_locals_but_keeps_function_bodies() {
    let out = SharedBuffer::default();
    let mut lox = Lox::with_output(CollectingReporter::new(), Box::new(out.clone()));
    let input = "fn keep(x) { var y = x; return y; }\n\
                 { var a = 1; print a; }\n\
                 { var a = 1; print a; }\n\
                 print keep(5);\n";

    lox.run_prompt(Cursor::new(input.as_bytes()), &mut Vec::<u8>::new())
        .expect("in-memory I/O cannot fail");

    assert_eq!(out.contents(), "1\n1\n5\n");
    assert!(lox.reporter().messages().is_empty());
    // Only `x` and `y` inside `keep` remain resolved.
    assert_eq!(lox.interpreter().local_count(), 2);
}
