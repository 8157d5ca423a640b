//! Emitter (C6, spec §4.6): renders the header/source text blobs from a
//! sequence of `ClassModel`s plus a per-run `run_id`.
//!
//! Emission is a pure function of the model and `run_id` (spec §9,
//! "deterministic emission") — no clock, no randomness beyond the `run_id`
//! that's threaded in from outside.

use std::fmt::Write as _;

use rand::distributions::Alphanumeric;
use rand::Rng;
use reflectgen_model::{Cursor, FieldModel, MethodModel};
use reflectgen_model::{ClassModel, Metadata, MetadataValue};

const HEADER_PREAMBLE: &str = r#"#pragma once
#if !defined(DURING_BUILD_TOOL_PROCESS)
#pragma warning(disable: 4244)
#include "class.h"
#include "metaspace.h"
#include "field.h"
#include "method.h"
#include "dynamic_container.h"
#include "polyfill.h"
#include "container/vector.hpp"
#include "container/shared_ptr.hpp"
#include "container/unique_ptr.hpp"
"#;

const HEADER_CLOSING: &str = "#pragma warning(default: 4244)\n#endif\n";

const SOURCE_PREAMBLE: &str = "#include <cassert>\n";

/// Generates a 16-character ASCII-letter `run_id` (spec §4.6).
pub fn generate_run_id() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .map(char::from)
        .filter(char::is_ascii_alphabetic)
        .take(16)
        .collect()
}

pub struct Emitter {
    header: String,
    source: String,
    run_id: String,
    registered_metaclasses: Vec<String>,
}

impl Emitter {
    pub fn new(run_id: String, input_header_spelling: &str) -> Self {
        let mut source = String::new();
        source.push_str(SOURCE_PREAMBLE);
        let _ = writeln!(source, "#include \"{input_header_spelling}\"");
        source.push_str("using namespace avalanche;\n\n");

        Self {
            header: HEADER_PREAMBLE.to_string(),
            source,
            run_id,
            registered_metaclasses: Vec::new(),
        }
    }

    /// Appends the forward-declaration/`class_name` trait, the metadata
    /// storage types, the field/method reflection classes, and the class
    /// reflection class for one registered class (spec §4.6, steps 1-2).
    pub fn emit_class<C: Cursor>(&mut self, model: &ClassModel<C>) {
        self.emit_header_forward_decl(model);

        if let Some(metadata) = &model.metadata {
            self.emit_metadata_storage(&model.metastorage_name, &model.fully_qualified_name, metadata);
        } else {
            self.emit_metadata_storage(&model.metastorage_name, &model.fully_qualified_name, &Metadata::new());
        }

        for &idx in &model.public_fields {
            let field = &model.fields[idx];
            let empty = Metadata::new();
            let metadata = field.metadata.as_ref().unwrap_or(&empty);
            self.emit_metadata_storage(&field.metastorage_name, &model.fully_qualified_name, metadata);
            self.emit_field_reflection_class(model, field);
        }

        for &idx in &model.public_methods {
            let method = &model.methods[idx];
            let empty = Metadata::new();
            let metadata = method.metadata.as_ref().unwrap_or(&empty);
            self.emit_metadata_storage(&method.metastorage_name, &model.fully_qualified_name, metadata);
            self.emit_method_reflection_class(model, method);
        }

        self.emit_class_reflection_class(model);
        self.registered_metaclasses.push(model.metaclass_name.clone());
    }

    fn emit_header_forward_decl<C: Cursor>(&mut self, model: &ClassModel<C>) {
        if model.namespace.is_empty() {
            let _ = writeln!(self.header, "{} {};", model.kind.as_str(), model.leaf_name);
        } else {
            let _ = writeln!(self.header, "namespace {} {{", model.namespace);
            let _ = writeln!(self.header, "{} {};", model.kind.as_str(), model.leaf_name);
            let _ = writeln!(self.header, "}} // namespace {}", model.namespace);
        }
        let _ = writeln!(
            self.header,
            "template <> struct avalanche::class_name<{fqn}> {{\n  static constexpr const char* value = \"{fqn}\";\n  static constexpr bool primitive = false;\n}};\n",
            fqn = model.fully_qualified_name
        );
    }

    fn emit_metadata_storage(&mut self, metastorage_name: &str, declaring_fqn: &str, metadata: &Metadata) {
        let _ = writeln!(
            self.source,
            "namespace avalanche::generated {{\nclass {metastorage_name} : public IMetadataKeyValueStorage {{\npublic:"
        );
        let _ = writeln!(
            self.source,
            "  Class* get_declaring_class() const override {{ return Class::for_name(class_name_v<{declaring_fqn}>); }}"
        );

        if metadata.is_empty() {
            let _ = writeln!(
                self.source,
                "  void keys(int32_t& out_count, const std::string_view*& out_keys) const override {{ out_count = 0; out_keys = nullptr; }}"
            );
        } else {
            let _ = write!(self.source, "  void keys(int32_t& out_count, const std::string_view*& out_keys) const override {{\n    static constexpr std::string_view k_keys[] = {{ ");
            let joined = metadata
                .keys()
                .map(|k| format!("\"{}\"", escape_cpp(k)))
                .collect::<Vec<_>>()
                .join(", ");
            let _ = writeln!(self.source, "{joined} }};");
            let _ = writeln!(self.source, "    out_count = sizeof(k_keys) / sizeof(k_keys[0]);");
            let _ = writeln!(self.source, "    out_keys = k_keys;\n  }}");
        }

        let _ = writeln!(
            self.source,
            "  const DynamicContainerBase* get(std::string_view key) const override {{"
        );
        for (key, value) in metadata {
            let (cpp_type, literal) = format_metadata_value(value);
            let container_name = format!("c_{}", sanitize_identifier(key));
            let _ = writeln!(self.source, "    if (key == \"{}\") {{", escape_cpp(key));
            let _ = writeln!(
                self.source,
                "      static GenericDynamicContainer<{cpp_type}> {container_name}({literal});"
            );
            let _ = writeln!(self.source, "      return &{container_name};");
            let _ = writeln!(self.source, "    }}");
        }
        let _ = writeln!(self.source, "    return nullptr;\n  }}\n}};\n}} // namespace avalanche::generated\n");
    }

    fn emit_field_reflection_class<C: Cursor>(&mut self, model: &ClassModel<C>, field: &FieldModel<C>) {
        let fqn = &model.fully_qualified_name;
        let _ = writeln!(
            self.source,
            "namespace avalanche::generated {{\nclass {name} : public avalanche::Field {{\npublic:",
            name = field.metaclass_name
        );
        let _ = writeln!(
            self.source,
            "  Chimera get(Chimera object) const override {{\n    assert(object.get_class() == Class::for_name(class_name_v<{fqn}>));\n    auto* obj = reinterpret_cast<{fqn}*>(object.data());\n    using FieldType = std::decay_t<std::remove_pointer_t<decltype(&obj->{field_name})>>;\n    return Chimera::own(FieldProxyStruct<FieldType>(&obj->{field_name}, Class::for_name(class_name_v<FieldType>)));\n  }}",
            field_name = field.display_name
        );
        let _ = writeln!(
            self.source,
            "  Class* get_declaring_class() const override {{ return Class::for_name(class_name_v<{fqn}>); }}"
        );
        let _ = writeln!(
            self.source,
            "  std::string_view get_name() const override {{ return \"{}\"; }}",
            escape_cpp(&field.display_name)
        );
        let _ = writeln!(
            self.source,
            "  const IMetadataKeyValueStorage* get_metadata() const override {{ static {storage} storage; return &storage; }}",
            storage = field.metastorage_name
        );
        let _ = writeln!(self.source, "}};\n}} // namespace avalanche::generated\n");
    }

    fn emit_method_reflection_class<C: Cursor>(&mut self, model: &ClassModel<C>, method: &MethodModel<C>) {
        let fqn = &model.fully_qualified_name;
        let params = method
            .param_typenames
            .iter()
            .map(|p| format!("std::remove_cvref_t<{p}>"))
            .collect::<Vec<_>>()
            .join(", ");
        let _ = writeln!(
            self.source,
            "namespace avalanche::generated {{\nclass {name} : public avalanche::Method {{\npublic:",
            name = method.metaclass_name
        );
        let _ = writeln!(
            self.source,
            "  size_t arg_hash() const override {{ return avalanche::arg_package_hash_v<{params}>; }}"
        );
        let _ = writeln!(
            self.source,
            "  Class* get_declaring_class() const override {{ return Class::for_name(class_name_v<{fqn}>); }}"
        );
        let _ = writeln!(
            self.source,
            "  std::string_view get_name() const override {{ return \"{}\"; }}",
            escape_cpp(&method.display_name)
        );
        let _ = writeln!(
            self.source,
            "  const IMetadataKeyValueStorage* get_metadata() const override {{ static {storage} storage; return &storage; }}",
            storage = method.metastorage_name
        );
        let _ = writeln!(self.source, "}};\n}} // namespace avalanche::generated\n");
    }

    fn emit_class_reflection_class<C: Cursor>(&mut self, model: &ClassModel<C>) {
        let fqn = &model.fully_qualified_name;
        let _ = writeln!(
            self.source,
            "namespace avalanche::generated {{\nclass {name} : public avalanche::Class {{\npublic:",
            name = model.metaclass_name
        );
        let _ = writeln!(
            self.source,
            "  std::string_view full_name() const override {{ return full_name_str(); }}"
        );
        let _ = writeln!(
            self.source,
            "  const std::string& full_name_str() const override {{ static std::string value(\"{fqn}\"); return value; }}"
        );
        let _ = writeln!(
            self.source,
            "  size_t hash() const override {{ return {hash}ULL; }}",
            hash = model.type_hash
        );

        if model.base_classes_flatten.is_empty() {
            let _ = writeln!(
                self.source,
                "  void base_classes(int32_t& out_count, const char* const*& out_names) const override {{ out_count = 0; out_names = nullptr; }}"
            );
        } else {
            let names = model
                .base_classes_flatten
                .iter()
                .map(|b| format!("\"{}\"", escape_cpp(&b.canonical_type_spelling())))
                .collect::<Vec<_>>()
                .join(", ");
            let _ = writeln!(
                self.source,
                "  void base_classes(int32_t& out_count, const char* const*& out_names) const override {{\n    static const char* const k_bases[] = {{ {names} }};\n    out_count = sizeof(k_bases) / sizeof(k_bases[0]);\n    out_names = k_bases;\n  }}"
            );
        }

        let _ = writeln!(
            self.source,
            "  bool is_derived_from_object() const override {{ return {}; }}",
            model.derived_from_object
        );

        if model.public_fields.is_empty() {
            let _ = writeln!(
                self.source,
                "  void fields(int32_t& out_count, avalanche::Field* const*& out_array) const override {{ out_count = 0; out_array = nullptr; }}"
            );
        } else {
            let _ = writeln!(
                self.source,
                "  void fields(int32_t& out_count, avalanche::Field* const*& out_array) const override {{"
            );
            for (i, &idx) in model.public_fields.iter().enumerate() {
                let _ = writeln!(
                    self.source,
                    "    static {cls} k_field_{i};",
                    cls = model.fields[idx].metaclass_name
                );
            }
            let refs = (0..model.public_fields.len())
                .map(|i| format!("&k_field_{i}"))
                .collect::<Vec<_>>()
                .join(", ");
            let _ = writeln!(
                self.source,
                "    static avalanche::Field* const k_fields[] = {{ {refs} }};\n    out_count = sizeof(k_fields) / sizeof(k_fields[0]);\n    out_array = k_fields;\n  }}"
            );
        }

        if model.public_methods.is_empty() {
            let _ = writeln!(
                self.source,
                "  void methods(int32_t& out_count, avalanche::Method* const*& out_array) const override {{ out_count = 0; out_array = nullptr; }}"
            );
        } else {
            let _ = writeln!(
                self.source,
                "  void methods(int32_t& out_count, avalanche::Method* const*& out_array) const override {{"
            );
            for (i, &idx) in model.public_methods.iter().enumerate() {
                let _ = writeln!(
                    self.source,
                    "    static {cls} k_method_{i};",
                    cls = model.methods[idx].metaclass_name
                );
            }
            let refs = (0..model.public_methods.len())
                .map(|i| format!("&k_method_{i}"))
                .collect::<Vec<_>>()
                .join(", ");
            let _ = writeln!(
                self.source,
                "    static avalanche::Method* const k_methods[] = {{ {refs} }};\n    out_count = sizeof(k_methods) / sizeof(k_methods[0]);\n    out_array = k_methods;\n  }}"
            );
        }

        let _ = writeln!(
            self.source,
            "  const IMetadataKeyValueStorage* get_metadata() const override {{ static {storage} storage; return &storage; }}",
            storage = model.metastorage_name
        );
        let _ = writeln!(self.source, "}};\n}} // namespace avalanche::generated\n");
    }

    /// Finalizes the accumulated blobs, appending the registration function
    /// and static registrar (spec §4.6, step 3), and closing the header's
    /// pragma/endif guard.
    pub fn finish(mut self) -> (String, String) {
        self.header.push_str(HEADER_CLOSING);

        let _ = writeln!(
            self.source,
            "avalanche::MetaSpaceProxy {run_id}_create_metaspace_internal__() {{",
            run_id = self.run_id
        );
        let _ = writeln!(self.source, "  auto result = avalanche::MetaSpace::get().create();");
        for metaclass in &self.registered_metaclasses {
            let _ = writeln!(
                self.source,
                "  result->register_class(new avalanche::generated::{metaclass}());"
            );
        }
        let _ = writeln!(self.source, "  return result;\n}}");
        let _ = writeln!(
            self.source,
            "static avalanche::MetaSpaceProxy G_{run_id}_METASPACE_ = {run_id}_create_metaspace_internal__();",
            run_id = self.run_id
        );

        (self.header, self.source)
    }
}

fn escape_cpp(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

fn sanitize_identifier(key: &str) -> String {
    key.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

fn format_metadata_value(value: &MetadataValue) -> (String, String) {
    match value {
        MetadataValue::Int(i) => ("int32_t".to_string(), i.to_string()),
        MetadataValue::Float(f) => ("float".to_string(), format!("{f}f")),
        MetadataValue::Bool(b) => ("bool".to_string(), b.to_string()),
        MetadataValue::String(s) => ("std::string_view".to_string(), format!("\"{}\"", escape_cpp(s))),
        MetadataValue::List(items) => (
            "std::string_view".to_string(),
            format!("\"{}\"", escape_cpp(&items.iter().map(render_scalar).collect::<Vec<_>>().join(";"))),
        ),
    }
}

fn render_scalar(value: &MetadataValue) -> String {
    match value {
        MetadataValue::Int(i) => i.to_string(),
        MetadataValue::Float(f) => f.to_string(),
        MetadataValue::Bool(b) => b.to_string(),
        MetadataValue::String(s) => s.clone(),
        MetadataValue::List(_) => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_id_is_sixteen_ascii_letters() {
        let id = generate_run_id();
        assert_eq!(id.chars().count(), 16);
        assert!(id.chars().all(|c| c.is_ascii_alphabetic()));
    }

    #[test]
    fn two_run_ids_differ() {
        assert_ne!(generate_run_id(), generate_run_id());
    }

    #[test]
    fn int_metadata_value_formats_as_int32() {
        assert_eq!(
            format_metadata_value(&MetadataValue::Int(1)),
            ("int32_t".to_string(), "1".to_string())
        );
    }

    #[test]
    fn list_metadata_value_joins_with_semicolons() {
        let list = MetadataValue::List(vec![MetadataValue::Int(1), MetadataValue::Int(2)]);
        let (ty, literal) = format_metadata_value(&list);
        assert_eq!(ty, "std::string_view");
        assert_eq!(literal, "\"1;2\"");
    }
}
