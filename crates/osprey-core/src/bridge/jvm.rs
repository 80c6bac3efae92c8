//! JVM-backed engine bridge using the JNI invocation API.
//!
//! Classes load through the class loader; members and entry points resolve
//! through `java.lang.reflect`, so the engine surface never needs
//! hand-written JNI signatures. Handles wrap global references and stay
//! valid for the life of the embedded VM.

use super::{Argument, EngineBridge, EngineHandle, LaunchOptions};
use crate::error::{BridgeError, EngineFault};
use glob::glob;
use jni::objects::{GlobalRef, JObject, JObjectArray, JString, JThrowable, JValue};
use jni::{AttachGuard, InitArgsBuilder, JNIEnv, JNIVersion, JavaVM};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::debug;

// libjvm refuses a second VM in the same process, even after the first one
// failed to come up, so the guard is never reset.
static JVM_STARTED: AtomicBool = AtomicBool::new(false);

pub struct JvmBridge {
    classpath: Vec<PathBuf>,
    vm: Option<JavaVM>,
}

impl JvmBridge {
    pub fn new() -> Self {
        Self {
            classpath: Vec::new(),
            vm: None,
        }
    }

    fn attach(&self) -> Result<AttachGuard<'_>, BridgeError> {
        let vm = self.vm.as_ref().ok_or(BridgeError::NotInitialized)?;
        vm.attach_current_thread()
            .map_err(|e| BridgeError::Bridge(format!("failed to attach to the embedded VM: {e}")))
    }
}

impl Default for JvmBridge {
    fn default() -> Self {
        Self::new()
    }
}

impl EngineBridge for JvmBridge {
    fn register_classpath(&mut self, entry: &str) -> Result<(), BridgeError> {
        if self.vm.is_some() {
            return Err(BridgeError::Classpath {
                entry: entry.to_string(),
                reason: "runtime already launched".to_string(),
            });
        }
        if entry.contains(['*', '?']) {
            let matches = glob(entry).map_err(|e| BridgeError::Classpath {
                entry: entry.to_string(),
                reason: e.to_string(),
            })?;
            // A pattern with no matches registers nothing; the gap surfaces
            // later as a class resolution failure.
            for path in matches {
                let path = path.map_err(|e| BridgeError::Classpath {
                    entry: entry.to_string(),
                    reason: e.to_string(),
                })?;
                self.classpath.push(path);
            }
        } else {
            self.classpath.push(PathBuf::from(entry));
        }
        Ok(())
    }

    fn launch(&mut self, options: &LaunchOptions) -> Result<(), BridgeError> {
        if self.vm.is_some() || JVM_STARTED.swap(true, Ordering::SeqCst) {
            return Err(BridgeError::AlreadyStarted);
        }

        let separator = if cfg!(windows) { ";" } else { ":" };
        let classpath = self
            .classpath
            .iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(separator);

        let mut builder = InitArgsBuilder::new()
            .version(JNIVersion::V8)
            .option(format!("-Xmx{}m", options.heap_size_mb))
            .option(format!("-Djava.class.path={classpath}"));
        if options.enable_assertions {
            builder = builder.option("-ea");
        }
        let args = builder
            .build()
            .map_err(|e| BridgeError::Launch(e.to_string()))?;

        let vm = JavaVM::new(args).map_err(|e| BridgeError::Launch(e.to_string()))?;
        self.vm = Some(vm);
        debug!(entries = self.classpath.len(), "embedded VM launched");
        Ok(())
    }

    fn resolve(&self, path: &str) -> Result<EngineHandle, BridgeError> {
        let mut guard = self.attach()?;
        let env: &mut JNIEnv = &mut guard;
        let segments: Vec<&str> = path.split('.').collect();

        // Longest dotted prefix that loads as a class wins; anything after
        // it must be a chain of static members.
        for split in (1..=segments.len()).rev() {
            let Some(class_obj) = find_class_object(env, &segments[..split]) else {
                continue;
            };
            let mut current = class_obj;
            for segment in &segments[split..] {
                match static_member(env, &current, segment) {
                    Some(next) => current = next,
                    None => {
                        return Err(BridgeError::SymbolNotFound {
                            path: path.to_string(),
                            segment: segment.to_string(),
                        });
                    }
                }
            }
            let global = env
                .new_global_ref(&current)
                .map_err(|e| bridge_err(env, e))?;
            return Ok(EngineHandle::new(global));
        }

        Err(BridgeError::SymbolNotFound {
            path: path.to_string(),
            segment: guess_failing_segment(&segments),
        })
    }

    fn invoke(&self, function: &str, args: &[Argument<'_>]) -> Result<EngineHandle, BridgeError> {
        let mut guard = self.attach()?;
        let env: &mut JNIEnv = &mut guard;
        let (class_path, method) =
            function
                .rsplit_once('.')
                .ok_or_else(|| BridgeError::SymbolNotFound {
                    path: function.to_string(),
                    segment: function.to_string(),
                })?;
        let class_segments: Vec<&str> = class_path.split('.').collect();
        let Some(class_obj) = find_class_object(env, &class_segments) else {
            return Err(BridgeError::SymbolNotFound {
                path: function.to_string(),
                segment: guess_failing_segment(&class_segments),
            });
        };
        let boxed = box_arguments(env, args)?;
        let receiver = JObject::null();
        call_reflected(env, &class_obj, &receiver, method, &boxed, args.len(), function)
    }

    fn invoke_on(
        &self,
        target: &EngineHandle,
        method: &str,
        args: &[Argument<'_>],
    ) -> Result<EngineHandle, BridgeError> {
        let mut guard = self.attach()?;
        let env: &mut JNIEnv = &mut guard;
        let global = global_of(target)?;
        let receiver = env
            .new_local_ref(global.as_obj())
            .map_err(|e| bridge_err(env, e))?;
        let class_obj: JObject = env
            .get_object_class(&receiver)
            .map_err(|e| bridge_err(env, e))?
            .into();
        let boxed = box_arguments(env, args)?;
        call_reflected(env, &class_obj, &receiver, method, &boxed, args.len(), method)
    }

    fn render_string(&self, value: &EngineHandle) -> Result<String, BridgeError> {
        let mut guard = self.attach()?;
        let env: &mut JNIEnv = &mut guard;
        let global = global_of(value)?;
        let rendered = env
            .call_method(global.as_obj(), "toString", "()Ljava/lang/String;", &[])
            .and_then(|v| v.l())
            .map_err(|e| bridge_err(env, e))?;
        if rendered.is_null() {
            return Ok(String::new());
        }
        string_of(env, rendered).map_err(|e| bridge_err(env, e))
    }
}

fn global_of(handle: &EngineHandle) -> Result<&GlobalRef, BridgeError> {
    handle
        .downcast_ref::<GlobalRef>()
        .ok_or_else(|| BridgeError::Bridge("engine handle was not minted by this bridge".to_string()))
}

/// Loads a class from its dotted segments, trying nested-class variants
/// (`pkg/Outer$Inner`) from the right. Clears any pending lookup exception.
fn find_class_object<'l>(env: &mut JNIEnv<'l>, segments: &[&str]) -> Option<JObject<'l>> {
    for split in (1..=segments.len()).rev() {
        let mut name = segments[..split].join("/");
        if split < segments.len() {
            name.push('$');
            name.push_str(&segments[split..].join("$"));
        }
        match env.find_class(name.as_str()) {
            Ok(class) => return Some(class.into()),
            Err(_) => {
                let _ = env.exception_clear();
            }
        }
    }
    None
}

/// Reads a public static field through reflection. Returns `None` (with the
/// pending exception cleared) when the member does not exist.
fn static_member<'l>(env: &mut JNIEnv<'l>, target: &JObject<'l>, name: &str) -> Option<JObject<'l>> {
    let jname = match env.new_string(name) {
        Ok(s) => s,
        Err(_) => {
            let _ = env.exception_clear();
            return None;
        }
    };
    let field = match env
        .call_method(
            target,
            "getField",
            "(Ljava/lang/String;)Ljava/lang/reflect/Field;",
            &[JValue::Object(&jname)],
        )
        .and_then(|v| v.l())
    {
        Ok(field) => field,
        Err(_) => {
            let _ = env.exception_clear();
            return None;
        }
    };
    match env
        .call_method(
            &field,
            "get",
            "(Ljava/lang/Object;)Ljava/lang/Object;",
            &[JValue::Object(&JObject::null())],
        )
        .and_then(|v| v.l())
    {
        Ok(value) => Some(value),
        Err(_) => {
            let _ = env.exception_clear();
            None
        }
    }
}

/// Finds a public method by name and arity and invokes it reflectively.
/// Reflection boxes and unboxes arguments, so no JNI signature is needed.
fn call_reflected<'l>(
    env: &mut JNIEnv<'l>,
    class_obj: &JObject<'l>,
    receiver: &JObject<'l>,
    name: &str,
    args_array: &JObjectArray<'l>,
    arity: usize,
    diagnostic_path: &str,
) -> Result<EngineHandle, BridgeError> {
    let methods = env
        .call_method(class_obj, "getMethods", "()[Ljava/lang/reflect/Method;", &[])
        .and_then(|v| v.l())
        .map_err(|e| bridge_err(env, e))?;
    let methods = JObjectArray::from(methods);
    let count = env
        .get_array_length(&methods)
        .map_err(|e| bridge_err(env, e))?;

    for index in 0..count {
        let method = env
            .get_object_array_element(&methods, index)
            .map_err(|e| bridge_err(env, e))?;
        let name_obj = env
            .call_method(&method, "getName", "()Ljava/lang/String;", &[])
            .and_then(|v| v.l())
            .map_err(|e| bridge_err(env, e))?;
        let method_name = string_of(env, name_obj).map_err(|e| bridge_err(env, e))?;
        if method_name != name {
            continue;
        }
        let parameter_count = env
            .call_method(&method, "getParameterCount", "()I", &[])
            .and_then(|v| v.i())
            .map_err(|e| bridge_err(env, e))?;
        if parameter_count as usize != arity {
            continue;
        }

        let outcome = env.call_method(
            &method,
            "invoke",
            "(Ljava/lang/Object;[Ljava/lang/Object;)Ljava/lang/Object;",
            &[JValue::Object(receiver), JValue::Object(args_array)],
        );
        return match outcome.and_then(|v| v.l()) {
            Ok(result) => {
                let global = env.new_global_ref(&result).map_err(|e| bridge_err(env, e))?;
                Ok(EngineHandle::new(global))
            }
            Err(e) => Err(bridge_err(env, e)),
        };
    }

    Err(BridgeError::SymbolNotFound {
        path: diagnostic_path.to_string(),
        segment: name.to_string(),
    })
}

/// Boxes host arguments into a `java.lang.Object[]` for reflective calls.
fn box_arguments<'l>(
    env: &mut JNIEnv<'l>,
    args: &[Argument<'_>],
) -> Result<JObjectArray<'l>, BridgeError> {
    let array = env
        .new_object_array(args.len() as i32, "java/lang/Object", JObject::null())
        .map_err(|e| bridge_err(env, e))?;
    for (index, arg) in args.iter().enumerate() {
        let boxed: JObject = match arg {
            Argument::Str(s) => env.new_string(s).map_err(|e| bridge_err(env, e))?.into(),
            Argument::Bool(b) => env
                .call_static_method(
                    "java/lang/Boolean",
                    "valueOf",
                    "(Z)Ljava/lang/Boolean;",
                    &[JValue::Bool(*b as u8)],
                )
                .and_then(|v| v.l())
                .map_err(|e| bridge_err(env, e))?,
            Argument::Int(i) => match i32::try_from(*i) {
                Ok(value) => env
                    .call_static_method(
                        "java/lang/Integer",
                        "valueOf",
                        "(I)Ljava/lang/Integer;",
                        &[JValue::Int(value)],
                    )
                    .and_then(|v| v.l())
                    .map_err(|e| bridge_err(env, e))?,
                Err(_) => env
                    .call_static_method(
                        "java/lang/Long",
                        "valueOf",
                        "(J)Ljava/lang/Long;",
                        &[JValue::Long(*i)],
                    )
                    .and_then(|v| v.l())
                    .map_err(|e| bridge_err(env, e))?,
            },
            Argument::Float(f) => env
                .call_static_method(
                    "java/lang/Double",
                    "valueOf",
                    "(D)Ljava/lang/Double;",
                    &[JValue::Double(*f)],
                )
                .and_then(|v| v.l())
                .map_err(|e| bridge_err(env, e))?,
            Argument::Handle(handle) => {
                let global = global_of(handle)?;
                env.new_local_ref(global.as_obj())
                    .map_err(|e| bridge_err(env, e))?
            }
        };
        env.set_object_array_element(&array, index as i32, boxed)
            .map_err(|e| bridge_err(env, e))?;
    }
    Ok(array)
}

fn string_of<'l>(env: &mut JNIEnv<'l>, obj: JObject<'l>) -> jni::errors::Result<String> {
    let jstr = JString::from(obj);
    Ok(env.get_string(&jstr)?.into())
}

fn bridge_err(env: &mut JNIEnv, error: jni::errors::Error) -> BridgeError {
    match error {
        jni::errors::Error::JavaException => BridgeError::Engine(take_engine_fault(env)),
        other => BridgeError::Bridge(other.to_string()),
    }
}

/// Converts the pending VM exception into an [`EngineFault`], unwrapping the
/// reflection wrapper so the engine's own error is reported. Best-effort:
/// inspection failures degrade to a synthetic message, never an error.
fn take_engine_fault(env: &mut JNIEnv) -> EngineFault {
    fn inspect<'l>(env: &mut JNIEnv<'l>) -> jni::errors::Result<EngineFault> {
        let mut throwable = env.exception_occurred()?;
        env.exception_clear()?;
        if throwable.is_null() {
            return Ok(EngineFault {
                message: Some("unknown engine error".to_string()),
                stacktrace: String::new(),
            });
        }

        loop {
            let wrapper =
                env.is_instance_of(&throwable, "java/lang/reflect/InvocationTargetException")?;
            if !wrapper {
                break;
            }
            let cause = env
                .call_method(&throwable, "getCause", "()Ljava/lang/Throwable;", &[])?
                .l()?;
            if cause.is_null() {
                break;
            }
            throwable = JThrowable::from(cause);
        }

        let message = {
            let value = env
                .call_method(&throwable, "getMessage", "()Ljava/lang/String;", &[])?
                .l()?;
            if value.is_null() {
                None
            } else {
                Some(string_of(env, value)?)
            }
        };

        let stacktrace = {
            let writer = env.new_object("java/io/StringWriter", "()V", &[])?;
            let printer = env.new_object(
                "java/io/PrintWriter",
                "(Ljava/io/Writer;)V",
                &[JValue::Object(&writer)],
            )?;
            env.call_method(
                &throwable,
                "printStackTrace",
                "(Ljava/io/PrintWriter;)V",
                &[JValue::Object(&printer)],
            )?;
            env.call_method(&printer, "flush", "()V", &[])?;
            let rendered = env
                .call_method(&writer, "toString", "()Ljava/lang/String;", &[])?
                .l()?;
            string_of(env, rendered)?
        };

        Ok(EngineFault {
            message,
            stacktrace,
        })
    }

    match inspect(env) {
        Ok(fault) => fault,
        Err(e) => {
            let _ = env.exception_clear();
            EngineFault {
                message: Some(format!("failed to inspect engine error: {e}")),
                stacktrace: String::new(),
            }
        }
    }
}

/// Best guess at the failing segment when no prefix of a dotted path loads
/// as a class: JNI cannot probe package existence without loading, so the
/// first class-looking segment (leading uppercase) is reported, falling back
/// to the last segment.
fn guess_failing_segment(segments: &[&str]) -> String {
    segments
        .iter()
        .find(|s| s.chars().next().is_some_and(|c| c.is_ascii_uppercase()))
        .or(segments.last())
        .map(|s| s.to_string())
        .unwrap_or_default()
}
