//! Request handling
//!
//! One request produces one file holding the generated Go statements, or an
//! error message in the response.

use fieldmap_codegen::{HeaderPopulator, HeaderPropagator, TypeConverter};
use prost::Message;
use prost_types::compiler::code_generator_response::File;
use prost_types::compiler::{CodeGeneratorRequest, CodeGeneratorResponse};

use crate::descriptor::DescriptorSchema;
use crate::error::PluginError;
use crate::params::{Mode, Params};

/// FEATURE_PROTO3_OPTIONAL
const SUPPORTED_FEATURES: u64 = 1;

/// Decode a request from raw bytes and handle it
pub fn generate_from_bytes(bytes: &[u8]) -> Result<CodeGeneratorResponse, PluginError> {
    let request = CodeGeneratorRequest::decode(bytes)?;
    Ok(generate(&request))
}

/// Handle a request, reporting failures through the response
pub fn generate(request: &CodeGeneratorRequest) -> CodeGeneratorResponse {
    match try_generate(request) {
        Ok(file) => CodeGeneratorResponse {
            file: vec![file],
            error: None,
            supported_features: Some(SUPPORTED_FEATURES),
        },
        Err(err) => {
            tracing::error!(error = %err, "field mapping generation failed");
            CodeGeneratorResponse {
                error: Some(err.to_string()),
                supported_features: Some(SUPPORTED_FEATURES),
                ..Default::default()
            }
        }
    }
}

fn try_generate(request: &CodeGeneratorRequest) -> Result<File, PluginError> {
    let params = Params::parse(request.parameter())?;
    let schema = DescriptorSchema::new(&request.proto_file);
    let to = schema.message(params.to()?)?;
    tracing::info!(mode = ?params.mode, to = %to.name, entries = params.field_map.len(), "generating");

    let lines = match params.mode {
        Mode::Convert => {
            let from = schema.message(params.from()?)?;
            let mut converter = TypeConverter::new(&schema).with_optional_entries(params.optional.clone());
            converter.generate(from.fields(), to.fields(), &params.field_map)?;
            converter.into_lines()
        }
        Mode::Populate => {
            let mut populator = HeaderPopulator::new(&schema);
            populator.populate(&header_names(&params), to.fields(), &params.field_map)?;
            populator.into_lines()
        }
        Mode::Propagate => {
            let mut propagator = HeaderPropagator::new(&schema);
            propagator.propagate(&header_names(&params), to.fields(), &params.field_map)?;
            propagator.into_lines()
        }
    };

    let mut content = lines.join("\n");
    content.push('\n');
    Ok(File {
        name: Some(params.output_name()?),
        content: Some(content),
        ..Default::default()
    })
}

fn header_names(params: &Params) -> Vec<String> {
    params
        .field_map
        .values()
        .map(|entry| entry.qualified_name.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use prost_types::field_descriptor_proto::{Label, Type};
    use prost_types::{DescriptorProto, FieldDescriptorProto, FileDescriptorProto};

    fn string_field(name: &str, number: i32) -> FieldDescriptorProto {
        FieldDescriptorProto {
            name: Some(name.to_string()),
            number: Some(number),
            label: Some(Label::Optional as i32),
            r#type: Some(Type::String as i32),
            ..Default::default()
        }
    }

    fn request(parameter: &str) -> CodeGeneratorRequest {
        let message = |name: &str, fields: Vec<FieldDescriptorProto>| DescriptorProto {
            name: Some(name.to_string()),
            field: fields,
            ..Default::default()
        };
        CodeGeneratorRequest {
            file_to_generate: vec!["api.proto".to_string()],
            parameter: Some(parameter.to_string()),
            proto_file: vec![FileDescriptorProto {
                name: Some("api.proto".to_string()),
                package: Some("api".to_string()),
                syntax: Some("proto3".to_string()),
                message_type: vec![
                    message("GetUser", vec![string_field("user_name", 1), string_field("token", 2)]),
                    message("GetUserRequest", vec![string_field("name", 1), string_field("token", 2)]),
                ],
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_convert() {
        let response = generate(&request("from=api.GetUser,to=api.GetUserRequest,map=Name=UserName"));

        assert_eq!(response.error, None);
        assert_eq!(response.supported_features, Some(1));
        let file = &response.file[0];
        assert_eq!(file.name(), "get_user_request_convert.go.txt");
        assert_eq!(file.content(), "out.Name = string(in.UserName)\nout.Token = string(in.Token)\n");
    }

    #[test]
    fn test_propagate() {
        let response = generate(&request("mode=propagate,to=api.GetUserRequest,map=Token=x-token!"));

        assert_eq!(response.error, None);
        assert_eq!(
            response.file[0].content(),
            "if key, ok := headers.Get(\"x-token\"); ok {\n\tin.Token = key\n}\n"
        );
    }

    #[test]
    fn test_errors_are_reported_in_response() {
        let response = generate(&request("to=api.GetUserRequest"));
        assert!(response.file.is_empty());
        assert_eq!(response.error.as_deref(), Some("invalid parameter: missing `from`"));

        let response = generate(&request("from=api.GetUser,to=api.Missing"));
        assert_eq!(response.error.as_deref(), Some("message not found: .api.Missing"));

        let response = generate(&request("from=api.GetUser,to=api.GetUserRequest,map=Name=Nope"));
        assert_eq!(response.error.as_deref(), Some("failed to find field ( Nope ) for transform"));
    }

    #[test]
    fn test_generate_from_bytes() {
        let bytes = request("from=api.GetUser,to=api.GetUserRequest,map=Name=UserName").encode_to_vec();
        let response = generate_from_bytes(&bytes).unwrap();
        assert_eq!(response.file.len(), 1);
    }
}
