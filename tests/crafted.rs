//! Integration tests over a crafted in-memory metadata image.
//!
//! The image models a small module: `Demo.Widget` (fields, methods, a
//! property, an event, a nested type), the enum `Demo.Colors`, `TypeSpec`
//! rows including a cyclic pair, and assembly references with two core
//! library candidates.

mod common;

use std::sync::Arc;

use common::{le16, le32, ImageBuilder};
use metascope::{
    metadata::{
        elements::ElementValue,
        members::{Member, MemberRefSignature},
        signatures::TypeSignature,
        tables::{CodedIndexType, TableId},
        token::Token,
    },
    Corlib, Error, Module,
};

struct Handles {
    us_hello: u32,
}

fn build_image() -> (Module, Handles) {
    let mut image = ImageBuilder::new();

    // strings
    let s_module_name = image.string("test.dll");
    let s_system = image.string("System");
    let s_enum = image.string("Enum");
    let s_object = image.string("Object");
    let s_type = image.string("Type");
    let s_module_type = image.string("<Module>");
    let s_demo = image.string("Demo");
    let s_widget = image.string("Widget");
    let s_colors = image.string("Colors");
    let s_inner = image.string("Inner");
    let s_count = image.string("count");
    let s_name = image.string("name");
    let s_value = image.string("value__");
    let s_red = image.string("Red");
    let s_tag = image.string("tag");
    let s_ctor = image.string(".ctor");
    let s_getname = image.string("GetName");
    let s_format = image.string("format");
    let s_prop_name = image.string("Name");
    let s_changed = image.string("Changed");
    let s_tostring = image.string("ToString");
    let s_sysrt = image.string("System.Runtime");
    let s_other = image.string("Other.Lib");

    // signature blobs
    let b_field_i4 = image.blob(&[0x06, 0x08]);
    let b_field_str = image.blob(&[0x06, 0x0E]);
    let b_field_colors = image.blob(&[0x06, 0x11, 0x0C]); // valuetype TypeDef(3)
    let b_ctor = image.blob(&[0x20, 0x00, 0x01]);
    let b_getname = image.blob(&[0x20, 0x01, 0x0E, 0x08]);
    let b_prop = image.blob(&[0x28, 0x00, 0x0E]);
    let b_tostring = image.blob(&[0x20, 0x00, 0x0E]);
    let b_spec_array = image.blob(&[0x1D, 0x08]); // int32[]
    let b_spec_to_3 = image.blob(&[0x11, 0x0E]); // valuetype TypeSpec(3)
    let b_spec_to_2 = image.blob(&[0x11, 0x0A]); // valuetype TypeSpec(2)

    let mvid = image.guid([0x11; 16]);
    let us_hello = image.user_string("Hello, CLR!");

    // Module
    let mut row = Vec::new();
    row.extend_from_slice(&le16(0));
    row.extend_from_slice(&le16(s_module_name));
    row.extend_from_slice(&le16(mvid));
    row.extend_from_slice(&le16(0));
    row.extend_from_slice(&le16(0));
    image.row(0x00, &row);

    // TypeRef: System.Enum, System.Object, System.Type - all scoped to
    // AssemblyRef 1 (ResolutionScope tag 2)
    for name in [s_enum, s_object, s_type] {
        let mut row = Vec::new();
        row.extend_from_slice(&le16((1 << 2) | 2));
        row.extend_from_slice(&le16(name));
        row.extend_from_slice(&le16(s_system));
        image.row(0x01, &row);
    }

    // TypeDef: <Module>, Demo.Widget, Demo.Colors, Inner (nested in Widget)
    // columns: flags, name, namespace, extends, field_list, method_list
    let typedefs: [(u32, u16, u16, u16, u16, u16); 4] = [
        (0x0000, s_module_type, 0, 0, 1, 1),
        (0x0001, s_widget, s_demo, (2 << 2) | 1, 1, 1),
        (0x0101, s_colors, s_demo, (1 << 2) | 1, 3, 3),
        (0x0002, s_inner, 0, (2 << 2) | 1, 5, 3),
    ];
    for (flags, name, namespace, extends, field_list, method_list) in typedefs {
        let mut row = Vec::new();
        row.extend_from_slice(&le32(flags));
        row.extend_from_slice(&le16(name));
        row.extend_from_slice(&le16(namespace));
        row.extend_from_slice(&le16(extends));
        row.extend_from_slice(&le16(field_list));
        row.extend_from_slice(&le16(method_list));
        image.row(0x02, &row);
    }

    // Field: count, name (Widget); value__, Red (Colors); tag (Inner)
    let fields: [(u16, u16, u16); 5] = [
        (0x0001, s_count, b_field_i4),
        (0x0001, s_name, b_field_str),
        (0x0606, s_value, b_field_i4),
        (0x8056, s_red, b_field_colors),
        (0x0001, s_tag, b_field_i4),
    ];
    for (flags, name, signature) in fields {
        let mut row = Vec::new();
        row.extend_from_slice(&le16(flags));
        row.extend_from_slice(&le16(name));
        row.extend_from_slice(&le16(signature));
        image.row(0x04, &row);
    }

    // MethodDef: .ctor, GetName (Widget); .ctor (Inner)
    let methods: [(u32, u16, u16, u16); 3] = [
        (0x2050, s_ctor, b_ctor, 1),
        (0x2060, s_getname, b_getname, 1),
        (0x2070, s_ctor, b_ctor, 2),
    ];
    for (rva, name, signature, param_list) in methods {
        let mut row = Vec::new();
        row.extend_from_slice(&le32(rva));
        row.extend_from_slice(&le16(0));
        row.extend_from_slice(&le16(0x0006));
        row.extend_from_slice(&le16(name));
        row.extend_from_slice(&le16(signature));
        row.extend_from_slice(&le16(param_list));
        image.row(0x06, &row);
    }

    // Param: GetName(format)
    let mut row = Vec::new();
    row.extend_from_slice(&le16(0));
    row.extend_from_slice(&le16(1));
    row.extend_from_slice(&le16(s_format));
    image.row(0x08, &row);

    // MemberRef: System.Object::ToString (MemberRefParent tag 1, TypeRef 2)
    let mut row = Vec::new();
    row.extend_from_slice(&le16((2 << 3) | 1));
    row.extend_from_slice(&le16(s_tostring));
    row.extend_from_slice(&le16(b_tostring));
    image.row(0x0A, &row);

    // EventMap + Event: Widget.Changed
    let mut row = Vec::new();
    row.extend_from_slice(&le16(2));
    row.extend_from_slice(&le16(1));
    image.row(0x12, &row);

    let mut row = Vec::new();
    row.extend_from_slice(&le16(0));
    row.extend_from_slice(&le16(s_changed));
    row.extend_from_slice(&le16((2 << 2) | 1));
    image.row(0x14, &row);

    // PropertyMap + Property: Widget.Name
    let mut row = Vec::new();
    row.extend_from_slice(&le16(2));
    row.extend_from_slice(&le16(1));
    image.row(0x15, &row);

    let mut row = Vec::new();
    row.extend_from_slice(&le16(0));
    row.extend_from_slice(&le16(s_prop_name));
    row.extend_from_slice(&le16(b_prop));
    image.row(0x17, &row);

    // TypeSpec: int32[], and a 2<->3 cycle
    for signature in [b_spec_array, b_spec_to_3, b_spec_to_2] {
        image.row(0x1B, &le16(signature));
    }

    // AssemblyRef: System.Runtime 4.0, Other.Lib 9.9, System.Runtime 8.0
    let assembly_refs: [(u16, u16, u16, u16, u16); 3] = [
        (4, 0, 0, 0, s_sysrt),
        (9, 9, 9, 9, s_other),
        (8, 0, 0, 0, s_sysrt),
    ];
    for (major, minor, build, revision, name) in assembly_refs {
        let mut row = Vec::new();
        row.extend_from_slice(&le16(major));
        row.extend_from_slice(&le16(minor));
        row.extend_from_slice(&le16(build));
        row.extend_from_slice(&le16(revision));
        row.extend_from_slice(&le32(0));
        row.extend_from_slice(&le16(0));
        row.extend_from_slice(&le16(name));
        row.extend_from_slice(&le16(0));
        row.extend_from_slice(&le16(0));
        image.row(0x23, &row);
    }

    // NestedClass: Inner (4) inside Widget (2)
    let mut row = Vec::new();
    row.extend_from_slice(&le16(4));
    row.extend_from_slice(&le16(2));
    image.row(0x29, &row);

    let module = Module::from_metadata(image.build()).unwrap();
    (module, Handles { us_hello })
}

#[test]
fn module_identity() {
    let (module, _) = build_image();

    assert_eq!(module.runtime_version(), "v4.0.30319");
    assert_eq!(module.name().unwrap(), "test.dll");

    let mvid = module.mvid().unwrap().unwrap();
    assert_eq!(mvid.to_bytes(), [0x11; 16]);
    assert_eq!(module.enc_id().unwrap(), None);
    assert_eq!(module.enc_base_id().unwrap(), None);
}

#[test]
fn token_identity_caching() {
    let (module, _) = build_image();
    let token = Token::new(0x0200_0002);

    let first = module.lookup_member(token).unwrap();
    let second = module.lookup_member(token).unwrap();

    let (Member::TypeDefinition(first), Member::TypeDefinition(second)) = (first, second) else {
        panic!("expected type definitions");
    };
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(first.full_name(), "Demo.Widget");
}

#[test]
fn nil_and_out_of_range_tokens() {
    let (module, _) = build_image();

    // nil: not found, no error
    assert!(module
        .try_lookup_member(Token::new(0x0200_0000))
        .unwrap()
        .is_none());
    assert!(matches!(
        module.lookup_member(Token::new(0x0200_0000)),
        Err(Error::TokenOutOfRange(_))
    ));

    // past the table: error, even through try_
    assert!(matches!(
        module.try_lookup_member(Token::new(0x0200_0005)),
        Err(Error::TokenOutOfRange(_))
    ));

    // a valid row of a non-member table: not found
    assert!(module
        .try_lookup_member(Token::new(0x2900_0001))
        .unwrap()
        .is_none());
}

#[test]
fn field_range_coverage_and_inverse() {
    let (module, _) = build_image();

    // FieldList [1, 1, 3, 5] over 6 fields: [1,1) [1,3) [3,5) [5,6)
    assert!(module.fields_of(1).unwrap().is_empty());
    let widget = module.fields_of(2).unwrap();
    assert_eq!((widget.start(), widget.end()), (1, 3));
    let colors = module.fields_of(3).unwrap();
    assert_eq!((colors.start(), colors.end()), (3, 5));
    let inner = module.fields_of(4).unwrap();
    assert_eq!((inner.start(), inner.end()), (5, 6));

    // coverage: every field RID claimed exactly once
    let mut claimed = vec![0u32; 5];
    for type_rid in 1..=4 {
        for token in module.fields_of(type_rid).unwrap() {
            claimed[(token.rid() - 1) as usize] += 1;
        }
    }
    assert_eq!(claimed, vec![1, 1, 1, 1, 1]);

    // inverse agreement
    for type_rid in 1..=4u32 {
        for token in module.fields_of(type_rid).unwrap() {
            assert_eq!(module.field_owner(token.rid()).unwrap(), type_rid);
        }
    }
    assert_eq!(module.field_owner(99).unwrap(), 0);
}

#[test]
fn method_range_last_owner() {
    let (module, _) = build_image();

    // MethodList [1, 1, 3, 3] over 3 methods; the last owner's run extends
    // to one past the table
    assert!(module.methods_of(1).unwrap().is_empty());
    let widget = module.methods_of(2).unwrap();
    assert_eq!((widget.start(), widget.end()), (1, 3));
    assert!(module.methods_of(3).unwrap().is_empty());
    let inner = module.methods_of(4).unwrap();
    assert_eq!((inner.start(), inner.end()), (3, 4));

    assert_eq!(module.method_owner(1).unwrap(), 2);
    assert_eq!(module.method_owner(3).unwrap(), 4);
}

#[test]
fn nested_types() {
    let (module, _) = build_image();

    let Member::TypeDefinition(widget) = module.lookup_member(Token::new(0x0200_0002)).unwrap()
    else {
        panic!("expected type definition");
    };
    assert!(!widget.is_nested());
    assert_eq!(widget.nested_types, vec![Token::new(0x0200_0004)]);

    let Member::TypeDefinition(inner) = module.lookup_member(Token::new(0x0200_0004)).unwrap()
    else {
        panic!("expected type definition");
    };
    assert!(inner.is_nested());
    assert_eq!(inner.enclosing_type, Some(Token::new(0x0200_0002)));

    let top_level: Vec<String> = module
        .top_level_types()
        .unwrap()
        .iter()
        .map(|ty| ty.name.clone())
        .collect();
    assert_eq!(top_level, vec!["<Module>", "Widget", "Colors"]);
}

#[test]
fn members_and_signatures() {
    let (module, _) = build_image();

    let Member::MethodDefinition(get_name) =
        module.lookup_member(Token::new(0x0600_0002)).unwrap()
    else {
        panic!("expected method definition");
    };
    assert_eq!(get_name.name, "GetName");
    assert!(get_name.signature.has_this);
    assert_eq!(get_name.signature.return_type.base, TypeSignature::String);
    assert_eq!(get_name.signature.params[0].base, TypeSignature::I4);
    assert_eq!((get_name.params.start(), get_name.params.end()), (1, 2));

    let Member::ParamDefinition(format) = module.lookup_member(Token::new(0x0800_0001)).unwrap()
    else {
        panic!("expected parameter");
    };
    assert_eq!(format.name, "format");
    assert_eq!(format.sequence, 1);

    let Member::FieldDefinition(count) = module.lookup_member(Token::new(0x0400_0001)).unwrap()
    else {
        panic!("expected field");
    };
    assert_eq!(count.name, "count");
    assert_eq!(count.signature.base, TypeSignature::I4);

    let Member::MemberReference(to_string) =
        module.lookup_member(Token::new(0x0A00_0001)).unwrap()
    else {
        panic!("expected member reference");
    };
    assert_eq!(to_string.name, "ToString");
    assert_eq!(to_string.class, Some(Token::new(0x0100_0002)));
    let MemberRefSignature::Method(signature) = &to_string.signature else {
        panic!("expected a method signature");
    };
    assert_eq!(signature.return_type.base, TypeSignature::String);

    let Member::PropertyDefinition(name_prop) =
        module.lookup_member(Token::new(0x1700_0001)).unwrap()
    else {
        panic!("expected property");
    };
    assert_eq!(name_prop.name, "Name");
    assert_eq!(name_prop.signature.base, TypeSignature::String);

    let Member::EventDefinition(changed) =
        module.lookup_member(Token::new(0x1400_0001)).unwrap()
    else {
        panic!("expected event");
    };
    assert_eq!(changed.name, "Changed");
    assert_eq!(changed.event_type, Some(Token::new(0x0100_0002)));

    let widget_properties = module.properties_of(2).unwrap();
    assert_eq!((widget_properties.start(), widget_properties.end()), (1, 2));
    let widget_events = module.events_of(2).unwrap();
    assert_eq!((widget_events.start(), widget_events.end()), (1, 2));
    assert_eq!(module.property_owner(1).unwrap(), 2);
    assert_eq!(module.event_owner(1).unwrap(), 2);
}

#[test]
fn user_string_lookup() {
    let (module, handles) = build_image();
    let token = Token::new(0x7000_0000 + handles.us_hello);

    assert_eq!(module.lookup_string(token).unwrap(), "Hello, CLR!");
    assert_eq!(
        module.try_lookup_string(token).unwrap(),
        Some("Hello, CLR!".to_string())
    );

    // nil string token
    assert_eq!(module.try_lookup_string(Token::new(0x7000_0000)).unwrap(), None);
    assert!(matches!(
        module.lookup_string(Token::new(0x7000_0000)),
        Err(Error::TokenOutOfRange(_))
    ));
}

#[test]
fn coded_index_encoder() {
    let (module, _) = build_image();
    let encoder = module.index_encoder(CodedIndexType::TypeDefOrRef);

    assert_eq!(encoder.width(), 2);

    let encoded = encoder.encode(Token::new(0x1B00_0002)).unwrap();
    assert_eq!(encoded, 0b1010);
    let decoded = encoder.decode(encoded).unwrap();
    assert_eq!(decoded.tag, TableId::TypeSpec);
    assert_eq!(decoded.row, 2);

    // tag 3 has no candidate
    assert!(matches!(
        encoder.decode(0b0011),
        Err(Error::InvalidCodedIndex(3))
    ));

    // full roundtrip over every candidate table and RID
    for kind in [
        CodedIndexType::TypeDefOrRef,
        CodedIndexType::HasSemantics,
        CodedIndexType::ResolutionScope,
    ] {
        let encoder = module.index_encoder(kind);
        for table in kind.tables() {
            for rid in 1..=module.table_row_count(*table) {
                let token = Token::from_table(*table, rid);
                let decoded = encoder.decode(encoder.encode(token).unwrap()).unwrap();
                assert_eq!(decoded.token, token);
            }
        }
    }
}

#[test]
fn corlib_discovery() {
    let (module, _) = build_image();

    let Some(Corlib::External(reference)) = module.corlib().unwrap() else {
        panic!("expected an external corlib");
    };
    assert_eq!(reference.name, "System.Runtime");
    assert_eq!(reference.version.to_string(), "8.0.0.0");
    assert_eq!(reference.token, Token::new(0x2300_0003));

    let names: Vec<String> = module
        .assembly_references()
        .unwrap()
        .iter()
        .map(|reference| reference.name.clone())
        .collect();
    assert_eq!(names, vec!["System.Runtime", "Other.Lib", "System.Runtime"]);
}

#[test]
fn typespec_expansion_and_recursion() {
    let (module, _) = build_image();

    let signature = module
        .type_spec_signature(Token::new(0x1B00_0001))
        .unwrap();
    let TypeSignature::SzArray(array) = signature else {
        panic!("expected an array signature");
    };
    assert_eq!(*array.base, TypeSignature::I4);

    // TypeSpec 2 and 3 reference each other
    assert!(matches!(
        module.type_spec_signature(Token::new(0x1B00_0002)),
        Err(Error::SignatureRecursion(_))
    ));

    let Member::TypeSpecification(spec) = module.lookup_member(Token::new(0x1B00_0001)).unwrap()
    else {
        panic!("expected type specification");
    };
    assert!(matches!(spec.signature, TypeSignature::SzArray(_)));
}

#[test]
fn element_decoding() {
    let (module, _) = build_image();

    // enum Colors : int32, wire 0x2A000000 decodes to 42
    let atom = TypeSignature::ValueType(Token::new(0x0200_0003));
    let value = module
        .read_element(&[0x2A, 0x00, 0x00, 0x00], &atom)
        .unwrap();
    assert_eq!(
        value,
        ElementValue::Enum(Token::new(0x0200_0003), Box::new(ElementValue::I4(42)))
    );

    // System.Type atom: SerString("System.Int32") decodes to I4
    let atom = TypeSignature::Class(Token::new(0x0100_0003));
    let mut wire = vec![0x0C];
    wire.extend_from_slice(b"System.Int32");
    assert_eq!(
        module.read_element(&wire, &atom).unwrap(),
        ElementValue::Type(TypeSignature::I4)
    );

    // plain primitive atom
    assert_eq!(
        module.read_element(&[0x01], &TypeSignature::Boolean).unwrap(),
        ElementValue::Boolean(true)
    );

    // a class that is neither special-cased nor an enum fails resolution:
    // Widget extends System.Object
    let atom = TypeSignature::Class(Token::new(0x0200_0002));
    assert!(matches!(
        module.read_element(&[0x00], &atom),
        Err(Error::MemberResolution(_))
    ));
}
