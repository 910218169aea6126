//! Integration tests for end-to-end compilation.
//!
//! These tests drive the public pipeline from source text through
//! tokenization, parsing, semantic analysis and Python generation. When a
//! `python3` interpreter is on the PATH, generated scripts are also executed
//! and their output checked.

use std::process::Command;

use minima::{
    analyzer::value::TypedValue,
    ast::statements::Stmt,
    driver::{check, compile, generate, CompileOptions},
    errors::errors::SemanticErrorKind,
    render_diagnostic, Position,
};
use pretty_assertions::assert_eq;

/// Runs a script with `python3`, or returns `None` when no interpreter is available.
fn run_python(script: &str) -> Option<String> {
    let output = Command::new("python3").arg("-c").arg(script).output().ok()?;
    assert!(
        output.status.success(),
        "python failed:\n{}\n--- script ---\n{}",
        String::from_utf8_lossy(&output.stderr),
        script
    );
    Some(String::from_utf8_lossy(&output.stdout).into_owned())
}

fn compile_and_run(source: &str) -> Option<String> {
    let compilation = compile(source, &CompileOptions::default()).unwrap();
    run_python(&compilation.python)
}

#[test]
fn test_mixed_addition_runs() {
    let source = "var x = 5; var y = 2.5; show x + y;";
    let compilation = compile(source, &CompileOptions::default()).unwrap();

    let Stmt::Show(show) = &compilation.program.body[2] else {
        panic!("expected a show statement");
    };
    assert_eq!(
        compilation.analysis.value_of(show.expression.id),
        Some(&TypedValue::Point(7.5))
    );

    if let Some(stdout) = run_python(&compilation.python) {
        assert_eq!(stdout, "7.5\n");
    }
}

#[test]
fn test_fixed_reassignment() {
    let (program, analysis) = check("fixed z = 3; z = 4;").unwrap();

    assert_eq!(analysis.errors.len(), 1);
    assert_eq!(analysis.errors[0].kind, SemanticErrorKind::ImmutableReassignment);
    assert_eq!(
        analysis.symbols.lookup_global_variable("z").map(|symbol| &symbol.value),
        Some(&TypedValue::Integer(3))
    );

    let python = generate(&program, &analysis, &CompileOptions::default());
    assert!(python.contains("z = 3\nz = 4\n"));
}

#[test]
fn test_undefined_function_call() {
    let (program, analysis) = check("var r = foo(1, 2);").unwrap();

    assert_eq!(analysis.errors.len(), 1);
    assert_eq!(analysis.errors[0].kind, SemanticErrorKind::UndefinedFunction);
    assert_eq!(analysis.errors[0].position(), Position(1, 9));

    let Stmt::VarDecl(decl) = &program.body[0] else {
        panic!("expected a declaration");
    };
    let call = decl.declarators[0].assigned_value.as_ref().unwrap();
    assert_eq!(analysis.value_of(call.id), Some(&TypedValue::Unknown));
}

#[test]
fn test_arity_mismatch_at_call_site() {
    let source = "func f(a, b) {\n  show c;\n}\nf(1);";
    let (_, analysis) = check(source).unwrap();

    let kinds: Vec<SemanticErrorKind> = analysis.errors.iter().map(|error| error.kind).collect();
    assert_eq!(
        kinds,
        [SemanticErrorKind::UndeclaredReference, SemanticErrorKind::ArityMismatch]
    );
    assert_eq!(analysis.errors[1].position(), Position(4, 1));
    assert_eq!(analysis.errors[1].message, "Function 'f' expects 2 arguments, got 1");
}

#[test]
fn test_printable_forms_match_python() {
    let source = r#"
        show YES;
        show empty;
        show "a" + 1;
        show 7 / 2;
        show ~7 % 3;
        show 2 * 3.0;
        show text(NO) + "!";
        show [1, 2] + [3];
    "#;

    if let Some(stdout) = compile_and_run(source) {
        assert_eq!(stdout, "YES\nempty\na1\n3.5\n2\n6.0\nNO!\n[1, 2, 3]\n");
    }
}

#[test]
fn test_functions_and_globals_run() {
    let source = r#"
        var total = 0;
        func bump(n) {
            total += n;
        }
        func add(a, b) {
            throw a + b;
        }
        bump(2);
        bump(add(1, 2));
        show total;
    "#;

    if let Some(stdout) = compile_and_run(source) {
        assert_eq!(stdout, "5\n");
    }
}

#[test]
fn test_nested_function_runs() {
    let source = r#"
        func outer() {
            var count = 1;
            func inner() {
                count += 10;
            }
            inner();
            throw count;
        }
        show outer();
    "#;

    if let Some(stdout) = compile_and_run(source) {
        assert_eq!(stdout, "11\n");
    }
}

#[test]
fn test_text_compound_assignment_runs() {
    let source = "var s = \"n=\"; s += 4; var k = 1; k += \"!\"; show s; show k;";

    if let Some(stdout) = compile_and_run(source) {
        assert_eq!(stdout, "n=4\n1!\n");
    }
}

#[test]
fn test_python_prints_what_the_analyzer_computed() {
    let cases = [
        ("var x; show x + 1;", "1"),
        ("var x; x *= 4; show x;", "0"),
        ("show 1 < \"a\";", "NO"),
        ("show empty >= 0;", "NO"),
        ("show ![1];", "YES"),
        ("var l = [1]; show l || NO;", "NO"),
        ("show [YES, \"a\", empty, 1.5];", "[YES, a, empty, 1.5]"),
        ("show 100000000.0 * 100000000.0;", "1e+16"),
        ("show 1.0 / 100000;", "1e-05"),
    ];

    for (source, printed) in cases {
        let compilation = compile(source, &CompileOptions::default()).unwrap();

        let Some(Stmt::Show(show)) = compilation.program.body.last() else {
            panic!("expected a trailing show statement in {}", source);
        };
        let value = compilation.analysis.value_of(show.expression.id).unwrap();
        assert_eq!(value.to_string(), printed, "analyzer value of {}", source);

        if let Some(stdout) = run_python(&compilation.python) {
            assert_eq!(stdout, format!("{}\n", printed), "python output of {}", source);
        }
    }
}

#[test]
fn test_runtime_values_print_like_show() {
    let source = r#"
        func f(a) {
            show "n=" + a;
            show a;
        }
        f(1);
        f(YES);
        f([NO, "x"]);
    "#;

    if let Some(stdout) = compile_and_run(source) {
        assert_eq!(stdout, "n=1\n1\nn=YES\nYES\nn=[NO, x]\n[NO, x]\n");
    }
}

#[test]
fn test_list_compound_assignment_leaves_aliases_alone() {
    let source = "var a = [1]; var b = a; b += [2]; show a; show b;";

    if let Some(stdout) = compile_and_run(source) {
        assert_eq!(stdout, "[1]\n[1, 2]\n");
    }
}

#[test]
fn test_errors_keep_source_order() {
    let source = "var a = 1;\nvar a = 2;\nshow b;\nfunc a() {}\nthrow 1;";
    let (_, analysis) = check(source).unwrap();

    let found: Vec<(SemanticErrorKind, u32)> = analysis
        .errors
        .iter()
        .map(|error| (error.kind, error.line))
        .collect();

    assert_eq!(
        found,
        [
            (SemanticErrorKind::DuplicateDeclaration, 2),
            (SemanticErrorKind::UndeclaredReference, 3),
            (SemanticErrorKind::DuplicateDeclaration, 4),
            (SemanticErrorKind::MisplacedThrow, 5),
        ]
    );
    assert_eq!(
        analysis.symbols.lookup_global_variable("a").map(|symbol| &symbol.value),
        Some(&TypedValue::Integer(1))
    );
}

#[test]
fn test_diagnostic_for_lexer_error() {
    let source = "var a = 1;\n  show a $ 2;";
    let error = check(source).unwrap_err();

    let rendered = render_diagnostic(source, "main.mn", *error.get_position(), error.get_error_name());
    assert_eq!(
        rendered,
        "Error: UnrecognisedToken\n-> main.mn:2:10\n  |\n2 | show a $ 2;\n  | -------^\n"
    );
}
