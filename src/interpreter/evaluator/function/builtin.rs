use std::{
    rc::Rc,
    time::{SystemTime, UNIX_EPOCH},
};

use crate::interpreter::{
    environment::Environment,
    evaluator::core::EvalResult,
    value::{
        callable::{NativeFn, NativeFunction},
        core::Value,
        property::Object,
    },
};

struct NativeDef {
    name:     &'static str,
    function: NativeFn,
}

/// Declares a table of host functions.
///
/// Each entry maps the name a program uses to the Rust function called.
macro_rules! native_table {
    ($table:ident { $($name:literal => $func:expr),* $(,)? }) => {
        static $table: &[NativeDef] = &[
            $(
                NativeDef { name: $name, function: $func },
            )*
        ];
    };
}

native_table!(GLOBAL_FUNCTIONS {
    "clock" => clock,
});

native_table!(CONSOLE_METHODS {
    "log"  => log,
    "warn" => log,
});

fn native(def: &NativeDef) -> Value {
    Value::Native(Rc::new(NativeFunction { name:     def.name,
                                           function: def.function, }))
}

/// Defines the host globals in `environment`.
///
/// - `console`: an object with `log` and `warn`.
/// - `clock()`: seconds since the Unix epoch, as a float.
///
/// # Example
/// ```
/// use ecmalite::interpreter::{environment::Environment, evaluator::function::builtin::register_globals};
///
/// let env = Environment::new();
/// register_globals(&env);
///
/// assert!(env.get("console").is_some());
/// assert!(env.get("clock").is_some());
/// ```
pub fn register_globals(environment: &Environment) {
    let mut console = Object::new();
    for def in CONSOLE_METHODS {
        console.insert(def.name, native(def));
    }
    environment.define("console", Value::from(console));

    for def in GLOBAL_FUNCTIONS {
        environment.define(def.name, native(def));
    }
}

/// Prints the renderings of `args`, separated by spaces, to standard output.
///
/// Always returns `null`.
pub fn log(args: &[Value], _line: usize) -> EvalResult<Value> {
    println!("{}", join(args));
    Ok(Value::Null)
}

fn join(args: &[Value]) -> String {
    args.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Returns the current time in seconds since the Unix epoch.
pub fn clock(_args: &[Value], _line: usize) -> EvalResult<Value> {
    let seconds = SystemTime::now().duration_since(UNIX_EPOCH)
                                   .map_or(0.0, |elapsed| elapsed.as_secs_f64());
    Ok(Value::Real(seconds))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::value::property::Property;

    #[test]
    fn arguments_are_space_joined() {
        let args = [Value::from("a"), Value::Integer(1), Value::Real(2.5), Value::Null];
        assert_eq!(join(&args), "a 1 2.5 null");
        assert_eq!(join(&[]), "");
    }

    #[test]
    fn log_returns_null() {
        assert_eq!(log(&[Value::Integer(1)], 1).unwrap(), Value::Null);
    }

    #[test]
    fn clock_moves_forward() {
        let Value::Real(seconds) = clock(&[], 1).unwrap() else {
            panic!("clock should return a float");
        };
        assert!(seconds > 1_600_000_000.0);
    }

    #[test]
    fn console_is_an_object_of_natives() {
        let env = Environment::new();
        register_globals(&env);
        let Some(Value::Object(console)) = env.get("console") else {
            panic!("console should be an object");
        };
        assert!(matches!(console.borrow().get(&Value::from("warn")), Some(Value::Native(_))));
    }
}
