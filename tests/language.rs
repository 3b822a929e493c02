use std::fs::{self};

use ecmalite::{Error, Value, error::RuntimeError, global_environment, interpret, parse};
use walkdir::WalkDir;

#[test]
fn script_examples_work() {
    let mut count = 0;

    for entry in
        WalkDir::new("tests/scripts").into_iter()
                                     .filter_map(Result::ok)
                                     .filter(|e| e.path().extension().is_some_and(|ext| ext == "js"))
    {
        let path = entry.path();
        let content =
            fs::read_to_string(path).unwrap_or_else(|e| panic!("Failed to read {path:?}: {e}"));
        let expected = extract_expectation(&content).unwrap_or_else(|| {
                                                        panic!("{path:?} has no '// expect:' first line")
                                                    });

        count += 1;
        match interpret(&content, &global_environment()) {
            Ok(value) => assert_eq!(value.to_string(), expected, "unexpected result for {path:?}"),
            Err(e) => panic!("Script {path:?} failed:\n{content}\nError: {e}"),
        }
    }

    assert!(count > 0, "No scripts found in tests/scripts");
}

fn extract_expectation(content: &str) -> Option<String> {
    content.lines()
           .next()
           .and_then(|line| line.trim().strip_prefix("// expect:"))
           .map(|expected| expected.trim().to_string())
}

fn run(src: &str) -> Result<Value, Error> {
    interpret(src, &global_environment())
}

fn assert_value(src: &str, expected: &Value) {
    match run(src) {
        Ok(value) => assert_eq!(&value, expected, "unexpected result for `{src}`"),
        Err(e) => panic!("Script failed: {e}"),
    }
}

fn assert_failure(src: &str) {
    if let Ok(value) = run(src) {
        panic!("Script succeeded with {value} but was expected to fail")
    }
}

fn render_program(src: &str) -> String {
    parse(src).unwrap_or_else(|e| panic!("Failed to parse: {e}"))
              .iter()
              .map(ToString::to_string)
              .collect()
}

#[test]
fn parsing_is_deterministic() {
    let src = "var a = [1,,2]; function f(x) { return x ** 2 ** 3; } class C { static n = 0; m() { this.n++; } }";
    assert_eq!(parse(src).unwrap(), parse(src).unwrap());
    assert_eq!(render_program(src), render_program(src));
}

#[test]
fn program_renders_canonically() {
    assert_eq!(render_program("var a = 1;"), "var a=1;");
    assert_eq!(render_program("var test = true; class Base { property = 1; method(a) { return 1.0; } } if (1.0) { return test; }"),
               "var test=true;class Base{property=1;method(a){return 1.0;}}if(1.0){return test;}");
    assert_eq!(render_program("a += 2; b &&= c;"), "a=a+2;b=b&&c;");
    assert_eq!(render_program("for (var i = 0; i < 2; i++) f(i);"),
               "{var i=0;while(i<2){f(i);i++;}}");
}

#[test]
fn arithmetic() {
    assert_value("1 - 'test';", &Value::NaN);
    assert_value("4**2**3;", &Value::Real(65536.0));
    assert_value("(4**2)**3;", &Value::Real(4096.0));
    assert_value("1 + 2 * 3;", &Value::Integer(7));
    assert_value("7 % 3;", &Value::Integer(1));
    assert_value("'a' + 1 + 2;", &Value::from("a12"));
    assert_value("1 / 0;", &Value::Real(f64::MAX));
}

#[test]
fn nan_is_propagated_by_equality() {
    assert_value("var n = 1 - 'a'; n == n;", &Value::NaN);
    assert_value("(1 - 'a') + 1;", &Value::NaN);
}

#[test]
fn truthiness_and_control_flow() {
    assert_value("var a=1; if(a){a=true}else{a=false}; a;", &Value::Bool(true));
    assert_value("var a=0; if(a){a=true}else{a=false}; a;", &Value::Bool(false));
    assert_value("var a=''; if(a){a=true}else{a=false}; a;", &Value::Bool(false));
    assert_value("var a=[]; if(a){a=true}else{a=false}; a;", &Value::Bool(true));
}

#[test]
fn logical_operators_short_circuit() {
    assert_value("var hit = false; function f() { hit = true; return 1; } false && f(); hit;",
                 &Value::Bool(false));
    assert_value("null || 'default';", &Value::from("default"));
    assert_value("var x = 1; x ||= 5; x;", &Value::Integer(1));
}

#[test]
fn arrays() {
    assert_value("var a=[1,2]; a[0];", &Value::Integer(1));
    assert_value("var a=[]; a[1]=1; a[1];", &Value::Integer(1));
    assert_value("var a=[]; a[2]=1; a[0];", &Value::Null);
    assert_value("var a=[,,]; a[0];", &Value::Null);
    assert_value("var a=[1]; a[5];", &Value::Null);
    assert_value("var a=[1]; a[-1]=3; a[-1];", &Value::Null);
    assert_value("var a=[1,2,3]; a[1.7];", &Value::Integer(2));
}

#[test]
fn objects() {
    assert_value("var a={b:1}; a.b;", &Value::Integer(1));
    assert_value("var a={}; a.b=2; a.b;", &Value::Integer(2));
    assert_value("var a={}; a['b']=3; a.b;", &Value::Integer(3));
    assert_value("var a={}; var b=a; b.x=1; a.x;", &Value::Integer(1));
    assert_value("var a={b:{c:[1,2]}}; a.b.c[1];", &Value::Integer(2));
}

#[test]
fn compound_property_assignment_resolves_its_target_once() {
    assert_value("var n=0; var o={x:1}; function g(){n++; return o;} g().x += 1; n;", &Value::Integer(1));
    assert_value("var i=0; var a=[10,20,30]; a[i++] += 5; a[1];", &Value::Integer(25));
    assert_value("var i=0; var a=[10,20,30]; a[i++] += 5; a[2];", &Value::Integer(30));
}

#[test]
fn self_referencing_objects_print_and_compare() {
    assert_value("var o={}; o.a=o; o.b=o; o.c=o; o.d=o; o.e=o; o == o;", &Value::Bool(true));
    assert_value("var o={}; o.a=o; o.b=o; '' + o;", &Value::from("{a:...,b:...}"));
}

#[test]
fn property_access_on_primitives_is_null() {
    assert_value("var a=1; a.b;", &Value::Null);
    assert_value("'text'.length;", &Value::Null);
}

#[test]
fn functions_and_closures() {
    assert_value("function add(a,b){return a+b;} add(1,2);", &Value::Integer(3));
    assert_value("function add(a,b){return a+b;} add(1,2.0);", &Value::Real(3.0));
    assert_value("var make = function(n) { return function() { return n; }; }; make(4)();",
                 &Value::Integer(4));
    assert_value("var x = 1; function set() { x = 2; } set(); x;", &Value::Integer(2));
}

#[test]
fn classes() {
    assert_value("var v = 1; class C { f = v; } v = 2; var c = new C(); c.f;", &Value::Integer(1));
    assert_value("class C { static s = 1; } var c = new C(); C.s = 2; C.s;", &Value::Integer(2));
    assert_value("class C { static s = 1; } var c = new C(); C.s = 2; c.s;", &Value::Null);
    assert_value("class P { constructor(x, y) { this.x = x; this.y = y; } sum() { return this.x + this.y; } }
                  var p = new P(2, 3); p.sum();",
                 &Value::Integer(5));
    assert_value("var K = class { m() { return 'anon'; } }; var k = new K(); k.m();", &Value::from("anon"));
}

#[test]
fn bitwise_operators() {
    assert_value("1 | 2;", &Value::Integer(3));
    assert_value("1 & 2;", &Value::Integer(0));
    assert_value("1 ^ 2;", &Value::Integer(3));
    assert_value("1 << 3;", &Value::Integer(8));
    assert_value("~2.0;", &Value::Integer(-3));
    assert_value("'a' | 1;", &Value::NaN);
}

#[test]
fn undeclared_assignment_fails_consistently() {
    assert_failure("x = 1;");
    assert_failure("{ y = 2; }");
    assert_failure("function f() { z = 3; } f();");
    assert!(matches!(run("missing;"),
                     Err(Error::Runtime(RuntimeError::UndefinedVariable { .. }))));
}

#[test]
fn runtime_failures() {
    assert_failure("var a = 1; a();");
    assert_failure("class A {} new A;");
    assert_failure("[1] - 1;");
    assert_failure("var o = {}; o < 1;");
}

#[test]
fn parse_failures() {
    for src in ["var = 1;", "1 = 2;", "'unterminated", "f(1;", "var a = 99999999999999999999;"] {
        assert!(matches!(run(src), Err(Error::Parse(_))), "`{src}` should not parse");
    }
}

#[test]
fn environment_persists_between_runs() {
    let env = global_environment();
    interpret("var counter = 0;", &env).unwrap();
    interpret("counter++;", &env).unwrap();
    assert_eq!(interpret("counter;", &env).unwrap(), Value::Integer(1));
}
