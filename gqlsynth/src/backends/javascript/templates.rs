//! JavaScript templates

use crate::backends::context::{
    ClientContext, EnumsContext, FragmentsContext, ImportContext, MethodContext, ModulesContext,
    OperationsContext, PlaceholderContext, ReexportContext, TypeIndexContext, TypesContext,
};
use crate::backends::{context, TemplateFn, TemplateSet};
use crate::error::GeneratorError;
use serde_json::Value;

const HEADER: &str = "// Generated by gqlsynth. Do not edit.\n";

pub(super) fn template_set() -> TemplateSet {
    TemplateSet::new(&[
        ("placeholder", placeholder as TemplateFn),
        ("enums", enums as TemplateFn),
        ("models", models as TemplateFn),
        ("inputs", inputs as TemplateFn),
        ("batch-index", batch_index as TemplateFn),
        ("reexport", reexport as TemplateFn),
        ("type-index", type_index as TemplateFn),
        ("fragments", fragments as TemplateFn),
        ("operations", operations as TemplateFn),
        ("utils", utils as TemplateFn),
        ("client", client as TemplateFn),
    ])
}

fn placeholder(value: &Value) -> Result<String, GeneratorError> {
    let ctx: PlaceholderContext = context("placeholder", value)?;
    Ok(format!("{HEADER}\n// {}\nexport {{}};\n", ctx.message))
}

fn enums(value: &Value) -> Result<String, GeneratorError> {
    let ctx: EnumsContext = context("enums", value)?;
    let mut out = String::from(HEADER);

    for item in &ctx.enums {
        out.push('\n');
        if ctx.comments {
            out.push_str(&format!(
                "/**\n * GraphQL enum `{}`\n * @enum {{string}}\n */\n",
                item.name
            ));
        } else {
            out.push_str("/** @enum {string} */\n");
        }
        out.push_str(&format!("export const {} = Object.freeze({{\n", item.name));
        for v in &item.values {
            out.push_str(&format!("  {v}: '{v}',\n"));
        }
        out.push_str("});\n");
    }

    Ok(out)
}

/// Type-only imports: one JSDoc typedef per name
fn typedef_imports(out: &mut String, imports: &[ImportContext]) {
    for import in imports {
        for name in &import.names {
            out.push_str(&format!(
                "/** @typedef {{import('{}').{name}}} {name} */\n",
                import.module
            ));
        }
    }
}

fn declarations(template: &str, value: &Value) -> Result<String, GeneratorError> {
    let ctx: TypesContext = context(template, value)?;
    let mut out = String::from(HEADER);

    if ctx.imports.iter().any(|i| !i.names.is_empty()) {
        out.push('\n');
        typedef_imports(&mut out, &ctx.imports);
    }

    for ty in &ctx.types {
        out.push_str("\n/**\n");
        if ctx.comments {
            out.push_str(&format!(" * GraphQL type `{}`\n", ty.schema_name));
        }
        out.push_str(&format!(" * @typedef {{Object}} {}\n", ty.name));
        for field in &ty.fields {
            let name = if field.required {
                field.name.clone()
            } else {
                format!("[{}]", field.name)
            };
            let description = if ctx.comments {
                format!(" `{}`", field.graphql_type)
            } else {
                String::new()
            };
            out.push_str(&format!(
                " * @property {{{}}} {name}{description}\n",
                field.type_expr
            ));
        }
        out.push_str(" */\n");
    }

    // typedefs alone do not make a module
    out.push_str("\nexport {};\n");
    Ok(out)
}

fn models(value: &Value) -> Result<String, GeneratorError> {
    declarations("models", value)
}

fn inputs(value: &Value) -> Result<String, GeneratorError> {
    declarations("inputs", value)
}

fn batch_index(value: &Value) -> Result<String, GeneratorError> {
    let ctx: ModulesContext = context("batch-index", value)?;
    let mut out = String::from(HEADER);
    out.push('\n');
    for module in &ctx.modules {
        out.push_str(&format!("export * from '{module}';\n"));
    }
    Ok(out)
}

fn reexport(value: &Value) -> Result<String, GeneratorError> {
    let ctx: ReexportContext = context("reexport", value)?;
    Ok(format!("{HEADER}\nexport * from '{}';\n", ctx.module))
}

fn type_index(value: &Value) -> Result<String, GeneratorError> {
    let ctx: TypeIndexContext = context("type-index", value)?;
    let mut out = String::from(HEADER);

    if !ctx.modules.is_empty() {
        out.push('\n');
        for module in &ctx.modules {
            out.push_str(&format!("export * from '{module}';\n"));
        }
    }

    if !ctx.scalars.is_empty() {
        out.push('\n');
        for scalar in &ctx.scalars {
            out.push_str(&format!("/** @typedef {{string}} {scalar} */\n"));
        }
    }

    if ctx.modules.is_empty() {
        out.push_str("\nexport {};\n");
    }

    Ok(out)
}

fn fragments(value: &Value) -> Result<String, GeneratorError> {
    let ctx: FragmentsContext = context("fragments", value)?;
    let mut out = String::from(HEADER);

    if ctx.fragments.is_empty() {
        out.push_str("\nexport const fragments = {};\n");
        return Ok(out);
    }

    for fragment in &ctx.fragments {
        out.push_str(&format!(
            "\nexport const {name} = `\nfragment {name} on {on_type} {{\n{selection}\n}}\n`;\n",
            name = fragment.name,
            on_type = fragment.on_type,
            selection = fragment.selection,
        ));
    }

    out.push_str("\nexport const fragments = {\n");
    for fragment in &ctx.fragments {
        out.push_str(&format!("  {},\n", fragment.name));
    }
    out.push_str("};\n");

    Ok(out)
}

fn method(out: &mut String, m: &MethodContext, with_utils: bool) {
    let ret = if m.nullable {
        format!("{} | null", m.return_type)
    } else {
        m.return_type.clone()
    };

    out.push_str("\n  /**\n");
    if !m.args.is_empty() {
        let members = m
            .args
            .iter()
            .map(|a| {
                let marker = if a.required { "" } else { "?" };
                format!("{}{marker}: {}", a.name, a.type_expr)
            })
            .collect::<Vec<_>>()
            .join(", ");
        out.push_str(&format!("   * @param {{{{ {members} }}}} variables\n"));
    }
    out.push_str(&format!("   * @returns {{Promise<{ret}>}}\n   */\n"));

    let (params, variables) = if m.args.is_empty() {
        ("", "")
    } else {
        ("variables", ", variables")
    };
    out.push_str(&format!("  async {name}({params}) {{\n", name = m.name));
    out.push_str(&format!("    const document = `\n{}\n`;\n", m.document));
    out.push_str(&format!(
        "    const request = async () => {{\n      \
         const data = await this.client.request(document{variables});\n      \
         return data.{name};\n    }};\n",
        name = m.name,
    ));
    if with_utils {
        out.push_str(
            "    return withTimeout(withRetry(request, this.options), this.options.timeout)();\n",
        );
    } else {
        out.push_str("    return request();\n");
    }
    out.push_str("  }\n");
}

fn operations(value: &Value) -> Result<String, GeneratorError> {
    let ctx: OperationsContext = context("operations", value)?;
    let mut out = String::from(HEADER);

    out.push('\n');
    if let Some(utils) = &ctx.utils_module {
        out.push_str(&format!("import {{ withRetry, withTimeout }} from '{utils}';\n"));
        out.push_str(&format!(
            "/** @typedef {{import('{utils}').ClientOptions}} ClientOptions */\n"
        ));
    }
    out.push_str(
        "/** @typedef {import('graphql-request').GraphQLClient} GraphQLClient */\n",
    );
    typedef_imports(&mut out, &ctx.imports);

    out.push_str(&format!("\n/** {} operations */\n", ctx.kind));
    out.push_str(&format!("export class {} {{\n", ctx.client_name));
    if ctx.utils_module.is_some() {
        out.push_str(
            "  /**\n   * @param {GraphQLClient} client\n   * @param {ClientOptions} [options]\n   */\n  \
             constructor(client, options = {}) {\n    \
             this.client = client;\n    this.options = options;\n  }\n",
        );
    } else {
        out.push_str(
            "  /** @param {GraphQLClient} client */\n  \
             constructor(client) {\n    this.client = client;\n  }\n",
        );
    }

    for m in &ctx.methods {
        method(&mut out, m, ctx.utils_module.is_some());
    }
    out.push_str("}\n");

    Ok(out)
}

const UTILS: &str = r#"
/**
 * @typedef {Object} ClientOptions
 * @property {number} [timeout] Request timeout in milliseconds
 * @property {number} [maxRetries] Retries after the first failed attempt
 * @property {number} [retryDelay] Base delay between retries in milliseconds, doubled per attempt
 * @property {Record<string, string>} [headers] Extra request headers
 */

/**
 * @template T
 * @param {() => Promise<T>} fn
 * @param {{ maxRetries?: number, retryDelay?: number }} [options]
 * @returns {() => Promise<T>}
 */
export function withRetry(fn, options = {}) {
  const maxRetries = options.maxRetries ?? 3;
  const retryDelay = options.retryDelay ?? 1000;

  return async () => {
    let lastError;
    for (let attempt = 0; attempt <= maxRetries; attempt++) {
      try {
        return await fn();
      } catch (error) {
        lastError = error;
        if (attempt < maxRetries) {
          await new Promise((resolve) => setTimeout(resolve, retryDelay * 2 ** attempt));
        }
      }
    }
    throw lastError;
  };
}

/**
 * @template T
 * @param {() => Promise<T>} fn
 * @param {number} [timeout]
 * @returns {() => Promise<T>}
 */
export function withTimeout(fn, timeout) {
  if (!timeout) {
    return fn;
  }

  return () =>
    new Promise((resolve, reject) => {
      const timer = setTimeout(() => reject(new Error(`request timed out after ${timeout}ms`)), timeout);
      fn().then(
        (value) => {
          clearTimeout(timer);
          resolve(value);
        },
        (error) => {
          clearTimeout(timer);
          reject(error);
        },
      );
    });
}
"#;

fn utils(_value: &Value) -> Result<String, GeneratorError> {
    Ok(format!("{HEADER}{UTILS}"))
}

fn client(value: &Value) -> Result<String, GeneratorError> {
    let ctx: ClientContext = context("client", value)?;
    let mut out = String::from(HEADER);

    out.push_str("\nimport { GraphQLClient } from 'graphql-request';\n");

    // one import line per module, in member order
    let mut modules: Vec<(&str, Vec<&str>)> = Vec::new();
    for member in &ctx.members {
        match modules.iter_mut().find(|(m, _)| *m == member.module) {
            Some((_, names)) => names.push(member.client.as_str()),
            None => modules.push((member.module.as_str(), vec![member.client.as_str()])),
        }
    }
    for (module, names) in &modules {
        out.push_str(&format!("import {{ {} }} from '{module}';\n", names.join(", ")));
    }

    if let Some(utils) = &ctx.utils_module {
        out.push_str(&format!(
            "/** @typedef {{import('{utils}').ClientOptions}} ClientOptions */\n"
        ));
        out.push_str(&format!(
            "\nexport class {} {{\n  /**\n   * @param {{string}} endpoint\n   \
             * @param {{ClientOptions}} [options]\n   */\n  \
             constructor(endpoint, options = {{}}) {{\n    \
             this.client = new GraphQLClient(endpoint, {{ headers: options.headers }});\n",
            ctx.client_name
        ));
        for member in &ctx.members {
            out.push_str(&format!(
                "    this.{} = new {}(this.client, options);\n",
                member.field, member.client
            ));
        }
    } else {
        out.push_str(&format!(
            "\nexport class {} {{\n  /**\n   * @param {{string}} endpoint\n   \
             * @param {{Record<string, string>}} [headers]\n   */\n  \
             constructor(endpoint, headers = {{}}) {{\n    \
             this.client = new GraphQLClient(endpoint, {{ headers }});\n",
            ctx.client_name
        ));
        for member in &ctx.members {
            out.push_str(&format!(
                "    this.{} = new {}(this.client);\n",
                member.field, member.client
            ));
        }
    }
    out.push_str("  }\n}\n");

    Ok(out)
}
