use logolang_check::check;
use logolang_syntax::{parse, Source};
use std::path::PathBuf;

fn test_check(source: String, expected_error: Option<(&str, &str)>) {
    let source = Source::new(PathBuf::from("testcase.logo"), source);
    let program = parse(&source).expect("testcase source must be syntactically valid");

    let actual_error = check(&source, &program)
        .err()
        .map(|err| (source.location(err.pos).to_string(), err.to_string()));
    let actual_error = actual_error
        .as_ref()
        .map(|(loc, msg)| (loc.as_str(), msg.as_str()));

    assert_eq!(expected_error, actual_error);
}

macro_rules! testcase {
    ($name:ident, $source:expr, $expected_error:expr) => {
        #[test]
        fn $name() {
            let source = $source.to_string();
            test_check(source, $expected_error);
        }
    };
}

const TEST_FORWARD_REFERENCE_SOURCE: &str = "\
TO A
  B
END
TO B
END
A
";
testcase!(test_forward_reference, TEST_FORWARD_REFERENCE_SOURCE, None);

const TEST_RECURSION_SOURCE: &str = "\
TO COUNTDOWN :N
  IF :N > 0 [ COUNTDOWN :N - 1 ]
END
COUNTDOWN 3
";
testcase!(test_recursion, TEST_RECURSION_SOURCE, None);

const TEST_UNDEFINED_PROCEDURE_SOURCE: &str = "\
TO A
END
A
FOO
";
testcase!(
    test_undefined_procedure,
    TEST_UNDEFINED_PROCEDURE_SOURCE,
    Some(("testcase.logo:4:1", "Procedure FOO is not defined"))
);

const TEST_CALL_ARITY_SOURCE: &str = "\
TO SQUARE
  FORWARD 10
END
SQUARE 10
";
testcase!(
    test_call_arity,
    TEST_CALL_ARITY_SOURCE,
    Some(("testcase.logo:4:1", "SQUARE expects 0 arguments, but found 1"))
);

testcase!(
    test_builtin_arity,
    "FORWARD 10 20",
    Some(("testcase.logo:1:1", "FORWARD expects 1 arguments, but found 2"))
);

const TEST_FOREIGN_PARAMETER_SOURCE: &str = "\
TO A :X
  FORWARD :X
END
TO B
  FORWARD :X
END
A 1
B
";
testcase!(
    test_foreign_parameter,
    TEST_FOREIGN_PARAMETER_SOURCE,
    Some(("testcase.logo:5:11", "Variable X is not defined"))
);

const TEST_GLOBAL_IN_PROCEDURE_SOURCE: &str = "\
MAKE \"X 1
TO A
  PRINT :X
END
A
";
testcase!(test_global_in_procedure, TEST_GLOBAL_IN_PROCEDURE_SOURCE, None);

const TEST_MAKE_UNDEFINED_SOURCE: &str = "\
TO A
  MAKE \"Y 1
END
A
";
testcase!(
    test_make_undefined_in_procedure,
    TEST_MAKE_UNDEFINED_SOURCE,
    Some(("testcase.logo:2:8", "Variable Y is not defined"))
);

const TEST_MAKE_PARAMETER_SOURCE: &str = "\
TO A :X
  MAKE \"X :X + 1
  PRINT :X
END
A 1
";
testcase!(test_make_parameter, TEST_MAKE_PARAMETER_SOURCE, None);

const TEST_DUPLICATE_PROCEDURE_SOURCE: &str = "\
TO A
END
TO A
END
";
testcase!(
    test_duplicate_procedure,
    TEST_DUPLICATE_PROCEDURE_SOURCE,
    Some((
        "testcase.logo:3:4",
        "Procedure A is redeclared. First declared at testcase.logo:1:4"
    ))
);

const TEST_BUILTIN_COLLISION_SOURCE: &str = "\
TO PRINT :MSG
END
";
testcase!(
    test_builtin_collision,
    TEST_BUILTIN_COLLISION_SOURCE,
    Some(("testcase.logo:1:4", "Procedure PRINT redeclares a builtin command"))
);

const TEST_CASE_INSENSITIVE_SOURCE: &str = "\
to a
end
A
";
testcase!(test_case_insensitive, TEST_CASE_INSENSITIVE_SOURCE, None);

testcase!(test_builtin_alias, "FO 10", None);
