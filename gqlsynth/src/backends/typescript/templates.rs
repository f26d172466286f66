//! TypeScript templates

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
            out.push_str(&format!("/** GraphQL enum `{}` */\n", item.name));
        }
        out.push_str(&format!("export enum {} {{\n", item.name));
        for v in &item.values {
            out.push_str(&format!("  {v} = '{v}',\n"));
        }
        out.push_str("}\n");
    }

    Ok(out)
}

fn import_line(import: &ImportContext) -> String {
    format!(
        "import {{ {} }} from '{}';\n",
        import.names.join(", "),
        import.module
    )
}

fn declarations(template: &str, value: &Value) -> Result<String, GeneratorError> {
    let ctx: TypesContext = context(template, value)?;
    let mut out = String::from(HEADER);

    if ctx.imports.iter().any(|i| !i.names.is_empty()) {
        out.push('\n');
    }
    for import in ctx.imports.iter().filter(|i| !i.names.is_empty()) {
        out.push_str(&import_line(import));
    }

    for ty in &ctx.types {
        out.push('\n');
        if ctx.comments {
            out.push_str(&format!("/** GraphQL type `{}` */\n", ty.schema_name));
        }
        out.push_str(&format!("export interface {} {{\n", ty.name));
        for field in &ty.fields {
            if ctx.comments {
                out.push_str(&format!("  /** `{}` */\n", field.graphql_type));
            }
            let marker = if field.required { "" } else { "?" };
            out.push_str(&format!("  {}{marker}: {};\n", field.name, field.type_expr));
        }
        out.push_str("}\n");
    }

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
            out.push_str(&format!("export type {scalar} = string;\n"));
        }
    }

    if ctx.modules.is_empty() && ctx.scalars.is_empty() {
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
    let params = if m.args.is_empty() {
        String::new()
    } else {
        let members = m
            .args
            .iter()
            .map(|a| {
                let marker = if a.required { "" } else { "?" };
                format!("{}{marker}: {}", a.name, a.type_expr)
            })
            .collect::<Vec<_>>()
            .join("; ");
        format!("variables: {{ {members} }}")
    };
    let variables = if m.args.is_empty() { "" } else { ", variables" };
    let ret = if m.nullable {
        format!("{} | null", m.return_type)
    } else {
        m.return_type.clone()
    };

    out.push_str(&format!(
        "\n  async {name}({params}): Promise<{ret}> {{\n",
        name = m.name,
    ));
    out.push_str(&format!("    const document = `\n{}\n`;\n", m.document));
    out.push_str(&format!(
        "    const request = async (): Promise<{ret}> => {{\n      \
         const data = await this.client.request<{{ {name}: {ret} }}>(document{variables});\n      \
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

    out.push_str("\nimport { GraphQLClient } from 'graphql-request';\n");
    for import in ctx.imports.iter().filter(|i| !i.names.is_empty()) {
        out.push_str(&import_line(import));
    }
    if let Some(utils) = &ctx.utils_module {
        out.push_str(&format!(
            "import {{ ClientOptions, withRetry, withTimeout }} from '{utils}';\n"
        ));
    }

    out.push_str(&format!("\n/** {} operations */\n", ctx.kind));
    out.push_str(&format!("export class {} {{\n", ctx.client_name));
    if ctx.utils_module.is_some() {
        out.push_str(
            "  constructor(\n    private readonly client: GraphQLClient,\n    \
             private readonly options: ClientOptions = {},\n  ) {}\n",
        );
    } else {
        out.push_str("  constructor(private readonly client: GraphQLClient) {}\n");
    }

    for m in &ctx.methods {
        method(&mut out, m, ctx.utils_module.is_some());
    }
    out.push_str("}\n");

    Ok(out)
}

const UTILS: &str = r#"
export interface ClientOptions {
  /** Request timeout in milliseconds */
  timeout?: number;
  /** Retries after the first failed attempt */
  maxRetries?: number;
  /** Base delay between retries in milliseconds, doubled per attempt */
  retryDelay?: number;
  /** Extra request headers */
  headers?: Record<string, string>;
}

export interface RetryOptions {
  maxRetries?: number;
  retryDelay?: number;
}

export function withRetry<T>(fn: () => Promise<T>, options: RetryOptions = {}): () => Promise<T> {
  const maxRetries = options.maxRetries ?? 3;
  const retryDelay = options.retryDelay ?? 1000;

  return async () => {
    let lastError: unknown;
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

export function withTimeout<T>(fn: () => Promise<T>, timeout?: number): () => Promise<T> {
  if (!timeout) {
    return fn;
  }

  return () =>
    new Promise<T>((resolve, reject) => {
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
        out.push_str(&format!("import {{ ClientOptions }} from '{utils}';\n"));
    }

    out.push_str(&format!("\nexport class {} {{\n", ctx.client_name));
    out.push_str("  private readonly client: GraphQLClient;\n");
    for member in &ctx.members {
        out.push_str(&format!("  public readonly {}: {};\n", member.field, member.client));
    }

    if ctx.utils_module.is_some() {
        out.push_str(
            "\n  constructor(endpoint: string, private readonly options: ClientOptions = {}) {\n    \
             this.client = new GraphQLClient(endpoint, { headers: options.headers });\n",
        );
        for member in &ctx.members {
            out.push_str(&format!(
                "    this.{} = new {}(this.client, this.options);\n",
                member.field, member.client
            ));
        }
    } else {
        out.push_str(
            "\n  constructor(endpoint: string, headers: Record<string, string> = {}) {\n    \
             this.client = new GraphQLClient(endpoint, { headers });\n",
        );
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
