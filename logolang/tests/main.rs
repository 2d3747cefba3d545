use logolang_check::check;
use logolang_lasmgen::generate;
use logolang_syntax::{parse, Source};
use std::path::PathBuf;
use test_log::test;

#[test]
fn test_compile_square() {
    let source = Source::new(
        PathBuf::from("square.logo"),
        String::from(
            "\
TO SQUARE :SIZE
  REPEAT 4 [ FORWARD :SIZE RIGHT 90 ]
END
SQUARE 80
",
        ),
    );

    let program = parse(&source).expect("square program must parse");
    let analysis = check(&source, &program).expect("square program must check");
    let lasm = generate(&program, &analysis);

    assert!(lasm.starts_with(".START __main__"));
    assert!(lasm.contains("SQUARE:"));
    assert!(lasm.contains("  STOR SQUARE.SIZE"));
    assert!(lasm.contains("  CALL SQUARE 1"));
    assert!(lasm.ends_with("  HALT\n"));
}

#[test]
fn test_undefined_procedure_stops_the_pipeline() {
    let source = Source::new(
        PathBuf::from("broken.logo"),
        String::from(
            "\
TO A
END
A
FOO
",
        ),
    );

    let program = parse(&source).expect("the program is syntactically valid");
    let err = check(&source, &program).expect_err("FOO is not declared and not a builtin");

    assert_eq!(err.to_string(), "Procedure FOO is not defined");
    assert_eq!(source.location(err.pos).to_string(), "broken.logo:4:1");
}
