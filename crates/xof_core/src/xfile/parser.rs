//! Recursive-descent parser over the token stream.
//!
//! One token of lookahead, no backtracking. Unknown templates and
//! instances are skipped by balanced-brace scanning; template definitions
//! are consumed flat and discarded. Every error is fatal for the file.

use std::collections::HashMap;
use std::path::PathBuf;

use log::warn;
use xof_math::{ImportConfig, Mat4, Vec2, Vec3, Vec4};

use crate::mesh::{FaceIndices, Mesh};
use crate::scene::{Frame, Material, Scene, SceneNode};

use super::assemble::assemble_mesh;
use super::error::{ParseError, ParseResult};
use super::stream::CharacterStream;
use super::token::{Token, TokenKind, Tokenizer};
use super::types::{MeshData, TemplateKind};

/// Parser state for one file.
pub struct Parser {
    tokenizer: Tokenizer,
    lookahead: Token,
    config: ImportConfig,
    /// Named top-level materials, referenceable by `{ Name }`.
    material_pool: HashMap<String, Material>,
    /// Directory of the source file, for texture path resolution.
    base_dir: Option<PathBuf>,
}

impl Parser {
    /// Create a parser over `stream`, priming the lookahead.
    pub fn new(
        stream: CharacterStream,
        config: ImportConfig,
        base_dir: Option<PathBuf>,
    ) -> ParseResult<Self> {
        let mut tokenizer = Tokenizer::new(stream);
        let lookahead = tokenizer.next_token()?;
        Ok(Self {
            tokenizer,
            lookahead,
            config,
            material_pool: HashMap::new(),
            base_dir,
        })
    }

    /// Parse the whole file into a scene named `name`.
    ///
    /// Parsing stops at the first non-identifier top-level token; anything
    /// after that point is ignored.
    pub fn parse(mut self, name: impl Into<String>) -> ParseResult<Scene> {
        self.parse_header()?;
        let mut scene = Scene::new(name);
        while self.lookahead.kind == TokenKind::Ident {
            if self.lookahead.value == "template" {
                self.parse_template_definition()?;
            } else {
                self.parse_instance(&mut scene)?;
            }
        }
        scene.materials = self.material_pool;
        Ok(scene)
    }

    /// Consume the lookahead and return it, fetching the next token.
    fn advance(&mut self) -> ParseResult<Token> {
        let next = self.tokenizer.next_token()?;
        Ok(std::mem::replace(&mut self.lookahead, next))
    }

    fn unexpected(&self, expected: impl Into<String>) -> ParseError {
        let found = if self.lookahead.value.is_empty() {
            self.lookahead.kind.describe().to_string()
        } else {
            self.lookahead.value.clone()
        };
        ParseError::UnexpectedToken {
            line: self.tokenizer.line(),
            expected: expected.into(),
            found,
        }
    }

    /// Require the lookahead to have `kind` (and `value`, when given) and
    /// consume it.
    fn match_token(&mut self, kind: TokenKind, value: Option<&str>) -> ParseResult<Token> {
        let matches =
            self.lookahead.kind == kind && value.map_or(true, |v| self.lookahead.value == v);
        if !matches {
            if self.lookahead.kind == TokenKind::Eof {
                return Err(ParseError::UnexpectedEof);
            }
            let expected = match value {
                Some(v) => format!("'{v}'"),
                None => kind.describe().to_string(),
            };
            return Err(self.unexpected(expected));
        }
        self.advance()
    }

    /// Consume a `,` or `;` list separator.
    fn check_separator(&mut self) -> ParseResult<()> {
        match self.lookahead.kind {
            TokenKind::Comma | TokenKind::Semicolon => {
                self.advance()?;
                Ok(())
            }
            TokenKind::Eof => Err(ParseError::UnexpectedEof),
            _ => Err(self.unexpected("',' or ';'")),
        }
    }

    /// Float literal, with the optional leading `-` token folded in.
    fn parse_float(&mut self) -> ParseResult<f32> {
        let negative = if self.lookahead.kind == TokenKind::Minus {
            self.advance()?;
            true
        } else {
            false
        };
        let token = self.match_token(TokenKind::Number, None)?;
        let value: f32 = token.value.parse().map_err(|_| ParseError::InvalidNumber {
            line: self.tokenizer.line(),
            value: token.value.clone(),
        })?;
        Ok(if negative { -value } else { value })
    }

    /// Unsigned count (array lengths, arities, material slots).
    fn parse_count(&mut self) -> ParseResult<usize> {
        let token = self.match_token(TokenKind::Number, None)?;
        token.value.parse().map_err(|_| ParseError::InvalidNumber {
            line: self.tokenizer.line(),
            value: token.value.clone(),
        })
    }

    /// Unsigned face index.
    fn parse_index(&mut self) -> ParseResult<u32> {
        let token = self.match_token(TokenKind::Number, None)?;
        token.value.parse().map_err(|_| ParseError::InvalidNumber {
            line: self.tokenizer.line(),
            value: token.value.clone(),
        })
    }

    /// `xof <version> txt <float size>`.
    fn parse_header(&mut self) -> ParseResult<()> {
        self.match_token(TokenKind::Ident, Some("xof"))?;
        self.match_token(TokenKind::Number, None)?;
        self.match_token(TokenKind::Ident, Some("txt"))?;
        self.match_token(TokenKind::Number, None)?;
        Ok(())
    }

    /// `template Name { ... }` with the body discarded. Template bodies
    /// never nest braces, so the scan is flat.
    fn parse_template_definition(&mut self) -> ParseResult<()> {
        self.match_token(TokenKind::Ident, Some("template"))?;
        self.match_token(TokenKind::Ident, None)?;
        self.match_token(TokenKind::LBrace, None)?;
        loop {
            match self.lookahead.kind {
                TokenKind::RBrace => {
                    self.advance()?;
                    return Ok(());
                }
                TokenKind::Eof => return Err(ParseError::UnexpectedEof),
                _ => {
                    self.advance()?;
                }
            }
        }
    }

    /// Consume an optional instance name and the opening brace.
    fn begin_block(&mut self) -> ParseResult<Option<String>> {
        let name = if self.lookahead.kind == TokenKind::Ident {
            Some(self.advance()?.value)
        } else {
            None
        };
        self.match_token(TokenKind::LBrace, None)?;
        Ok(name)
    }

    /// Skip an instance of an unrecognized template: the keyword has been
    /// consumed, the optional name and the brace-balanced body follow.
    fn skip_unknown_block(&mut self) -> ParseResult<()> {
        if self.lookahead.kind == TokenKind::Ident {
            self.advance()?;
        }
        self.match_token(TokenKind::LBrace, None)?;
        let mut depth = 1usize;
        while depth > 0 {
            match self.lookahead.kind {
                TokenKind::LBrace => depth += 1,
                TokenKind::RBrace => depth -= 1,
                TokenKind::Eof => {
                    return Err(ParseError::UnbalancedBraces {
                        line: self.tokenizer.line(),
                    })
                }
                _ => {}
            }
            self.advance()?;
        }
        Ok(())
    }

    /// One top-level object.
    fn parse_instance(&mut self, scene: &mut Scene) -> ParseResult<()> {
        let token = self.match_token(TokenKind::Ident, None)?;
        match TemplateKind::from_name(&token.value) {
            TemplateKind::Frame => {
                let frame = self.parse_frame()?;
                scene.nodes.push(SceneNode::Frame(frame));
            }
            TemplateKind::Mesh => {
                let mesh = self.parse_mesh()?;
                scene.nodes.push(SceneNode::Mesh(mesh));
            }
            TemplateKind::Material => {
                let name = self.begin_block()?;
                let material = self.parse_material_body()?;
                match name {
                    Some(name) => {
                        self.material_pool.insert(name, material);
                    }
                    None => warn!(
                        "unnamed top-level Material near line {} cannot be referenced, ignoring",
                        self.tokenizer.line()
                    ),
                }
            }
            _ => self.skip_unknown_block()?,
        }
        Ok(())
    }

    /// `Frame [name] { FrameTransformMatrix? Mesh? Frame* ... }`. When a
    /// frame carries several meshes the last one wins.
    fn parse_frame(&mut self) -> ParseResult<Frame> {
        let name = self.begin_block()?;
        let mut frame = Frame::new(name);
        loop {
            match self.lookahead.kind {
                TokenKind::RBrace => {
                    self.advance()?;
                    return Ok(frame);
                }
                TokenKind::Ident => {
                    let token = self.advance()?;
                    match TemplateKind::from_name(&token.value) {
                        TemplateKind::Frame => frame.children.push(self.parse_frame()?),
                        TemplateKind::Mesh => frame.mesh = Some(self.parse_mesh()?),
                        TemplateKind::FrameTransformMatrix => {
                            frame.transform = self.parse_frame_transform()?;
                        }
                        _ => self.skip_unknown_block()?,
                    }
                }
                TokenKind::Eof => return Err(ParseError::UnexpectedEof),
                _ => return Err(self.unexpected("frame member or '}'")),
            }
        }
    }

    /// 16 comma-separated floats, column-major, closed by `;;`.
    fn parse_frame_transform(&mut self) -> ParseResult<Mat4> {
        self.begin_block()?;
        let mut values = [0.0f32; 16];
        for (i, slot) in values.iter_mut().enumerate() {
            if i > 0 {
                self.match_token(TokenKind::Comma, None)?;
            }
            *slot = self.parse_float()?;
        }
        self.match_token(TokenKind::Semicolon, None)?;
        // The member terminator after the array terminator; tolerated when
        // missing.
        if self.lookahead.kind == TokenKind::Semicolon {
            self.advance()?;
        }
        self.match_token(TokenKind::RBrace, None)?;
        Ok(self.config.convert_matrix(Mat4::from_cols_array(&values)))
    }

    /// `Mesh [name] { vertices faces sub-blocks* }`.
    fn parse_mesh(&mut self) -> ParseResult<Mesh> {
        self.begin_block()?;

        let mut data = MeshData::default();
        data.coords.push(Vec3::ZERO); // placeholder keeping indices 1-based
        let vertices = self.parse_vector_list()?;
        data.coords.extend(vertices);
        data.faces = self.parse_face_list(1)?;

        while self.lookahead.kind == TokenKind::Ident {
            let token = self.advance()?;
            match TemplateKind::from_name(&token.value) {
                TemplateKind::MeshMaterialList => self.parse_mesh_material_list(&mut data)?,
                TemplateKind::MeshNormals => self.parse_mesh_normals(&mut data)?,
                TemplateKind::MeshTextureCoords => self.parse_mesh_texture_coords(&mut data)?,
                TemplateKind::MeshVertexColors => self.parse_mesh_vertex_colors(&mut data)?,
                _ => self.skip_unknown_block()?,
            }
        }
        self.match_token(TokenKind::RBrace, None)?;
        Ok(assemble_mesh(data))
    }

    /// `x; y; z;` converted into the target convention.
    fn parse_vector(&mut self) -> ParseResult<Vec3> {
        let x = self.parse_float()?;
        self.match_token(TokenKind::Semicolon, None)?;
        let y = self.parse_float()?;
        self.match_token(TokenKind::Semicolon, None)?;
        let z = self.parse_float()?;
        self.match_token(TokenKind::Semicolon, None)?;
        Ok(self.config.convert_position(Vec3::new(x, y, z)))
    }

    /// Counted vector list: `n; v, v, ... v;`.
    fn parse_vector_list(&mut self) -> ParseResult<Vec<Vec3>> {
        let count = self.parse_count()?;
        self.match_token(TokenKind::Semicolon, None)?;
        let mut vectors = Vec::with_capacity(count);
        for _ in 0..count {
            vectors.push(self.parse_vector()?);
            self.check_separator()?;
        }
        Ok(vectors)
    }

    /// Counted face list: `n; arity; i, i, ... i;, ...`.
    ///
    /// Indices are shifted by `offset` (1 for the position space, 0 for the
    /// normal space). Triangles are padded to degenerate quads; faces with
    /// any other arity are consumed and dropped.
    fn parse_face_list(&mut self, offset: u32) -> ParseResult<Vec<FaceIndices>> {
        let count = self.parse_count()?;
        self.match_token(TokenKind::Semicolon, None)?;
        let mut faces = Vec::with_capacity(count);
        for _ in 0..count {
            let arity = self.parse_count()?;
            self.match_token(TokenKind::Semicolon, None)?;
            let mut indices = Vec::with_capacity(arity);
            for i in 0..arity {
                if i > 0 {
                    self.match_token(TokenKind::Comma, None)?;
                }
                indices.push(self.parse_index()? + offset);
            }
            self.match_token(TokenKind::Semicolon, None)?;
            self.check_separator()?;

            if self.config.reverses_winding() {
                indices.reverse();
            }
            match indices.len() {
                3 => faces.push([indices[0], indices[1], indices[2], indices[0]]),
                4 => faces.push([indices[0], indices[1], indices[2], indices[3]]),
                arity => warn!(
                    "dropping face with {} indices at line {}",
                    arity,
                    self.tokenizer.line()
                ),
            }
        }
        Ok(faces)
    }

    /// `MeshNormals { vectors faces }`, an independent 0-based index space.
    fn parse_mesh_normals(&mut self, data: &mut MeshData) -> ParseResult<()> {
        self.begin_block()?;
        data.normals = self.parse_vector_list()?;
        data.face_normals = self.parse_face_list(0)?;
        self.match_token(TokenKind::RBrace, None)?;
        Ok(())
    }

    /// `MeshTextureCoords { n; u; v;, ... }`. V is flipped so the origin
    /// moves from top-left to bottom-left.
    fn parse_mesh_texture_coords(&mut self, data: &mut MeshData) -> ParseResult<()> {
        self.begin_block()?;
        let count = self.parse_count()?;
        self.match_token(TokenKind::Semicolon, None)?;
        data.tex_coords.clear();
        data.tex_coords.push(Vec2::ZERO); // placeholder
        for _ in 0..count {
            let u = self.parse_float()?;
            self.match_token(TokenKind::Semicolon, None)?;
            let v = self.parse_float()?;
            self.match_token(TokenKind::Semicolon, None)?;
            data.tex_coords.push(Vec2::new(u, 1.0 - v));
            self.check_separator()?;
        }
        self.match_token(TokenKind::RBrace, None)?;
        Ok(())
    }

    /// `MeshVertexColors { n; index; r; g; b; a;;, ... }`. Entries carry an
    /// explicit vertex index and may arrive in any order, with gaps left
    /// opaque white.
    fn parse_mesh_vertex_colors(&mut self, data: &mut MeshData) -> ParseResult<()> {
        self.begin_block()?;
        let count = self.parse_count()?;
        self.match_token(TokenKind::Semicolon, None)?;
        data.vertex_colors.clear();
        data.vertex_colors.push(Vec4::ONE); // placeholder
        for _ in 0..count {
            let index = self.parse_index()? as usize;
            self.match_token(TokenKind::Semicolon, None)?;
            let r = self.parse_component()?;
            let g = self.parse_component()?;
            let b = self.parse_component()?;
            let a = self.parse_component()?;
            // Color member terminator, absent in some exporters.
            if self.lookahead.kind == TokenKind::Semicolon {
                self.advance()?;
            }
            let slot = index + 1;
            if data.vertex_colors.len() <= slot {
                data.vertex_colors.resize(slot + 1, Vec4::ONE);
            }
            data.vertex_colors[slot] = Vec4::new(r, g, b, a);
            self.check_separator()?;
        }
        self.match_token(TokenKind::RBrace, None)?;
        Ok(())
    }

    /// `MeshMaterialList { nMaterials; nIndices; i, ... i; entries* }`
    /// where each entry is an inline `Material` block or a `{ Name }`
    /// reference into the top-level pool.
    fn parse_mesh_material_list(&mut self, data: &mut MeshData) -> ParseResult<()> {
        self.begin_block()?;
        self.parse_count()?; // declared material count, not trusted
        self.match_token(TokenKind::Semicolon, None)?;
        let index_count = self.parse_count()?;
        self.match_token(TokenKind::Semicolon, None)?;
        for i in 0..index_count {
            if i > 0 {
                self.match_token(TokenKind::Comma, None)?;
            }
            data.face_material_index.push(self.parse_count()?);
        }
        self.match_token(TokenKind::Semicolon, None)?;
        // List terminator, doubled by some exporters.
        if self.lookahead.kind == TokenKind::Semicolon {
            self.advance()?;
        }
        loop {
            match self.lookahead.kind {
                TokenKind::RBrace => {
                    self.advance()?;
                    return Ok(());
                }
                TokenKind::LBrace => {
                    self.advance()?;
                    let name = self.match_token(TokenKind::Ident, None)?;
                    self.match_token(TokenKind::RBrace, None)?;
                    match self.material_pool.get(&name.value) {
                        Some(material) => data.materials.push(material.clone()),
                        None => {
                            return Err(ParseError::UndefinedMaterial {
                                line: self.tokenizer.line(),
                                name: name.value,
                            })
                        }
                    }
                }
                TokenKind::Ident => {
                    let token = self.advance()?;
                    if TemplateKind::from_name(&token.value) == TemplateKind::Material {
                        self.begin_block()?;
                        data.materials.push(self.parse_material_body()?);
                    } else {
                        self.skip_unknown_block()?;
                    }
                }
                TokenKind::Eof => return Err(ParseError::UnexpectedEof),
                _ => return Err(self.unexpected("material entry or '}'")),
            }
        }
    }

    /// Material block body, the opening brace already consumed: face color,
    /// specular power, specular, emissive, then optional `TextureFilename`.
    fn parse_material_body(&mut self) -> ParseResult<Material> {
        let diffuse = self.parse_color_rgba()?;
        let specular_power = self.parse_component()?;
        let specular = self.parse_color_rgb()?;
        let emissive = self.parse_color_rgb()?;
        let mut texture = None;
        while self.lookahead.kind == TokenKind::Ident {
            if TemplateKind::from_name(&self.lookahead.value) != TemplateKind::TextureFilename {
                return Err(self.unexpected("'TextureFilename'"));
            }
            self.advance()?;
            self.begin_block()?;
            let path = self.match_token(TokenKind::StringLit, None)?.value;
            self.match_token(TokenKind::Semicolon, None)?;
            self.match_token(TokenKind::RBrace, None)?;
            texture = Some(self.resolve_texture_path(&path));
        }
        self.match_token(TokenKind::RBrace, None)?;
        Ok(Material {
            diffuse,
            specular_power,
            specular,
            emissive,
            texture,
        })
    }

    /// One `;`-terminated float member.
    fn parse_component(&mut self) -> ParseResult<f32> {
        let value = self.parse_float()?;
        self.match_token(TokenKind::Semicolon, None)?;
        Ok(value)
    }

    /// `r; g; b; a;;`.
    fn parse_color_rgba(&mut self) -> ParseResult<Vec4> {
        let r = self.parse_component()?;
        let g = self.parse_component()?;
        let b = self.parse_component()?;
        let a = self.parse_component()?;
        self.match_token(TokenKind::Semicolon, None)?;
        Ok(Vec4::new(r, g, b, a))
    }

    /// `r; g; b;;`.
    fn parse_color_rgb(&mut self) -> ParseResult<Vec3> {
        let r = self.parse_component()?;
        let g = self.parse_component()?;
        let b = self.parse_component()?;
        self.match_token(TokenKind::Semicolon, None)?;
        Ok(Vec3::new(r, g, b))
    }

    fn resolve_texture_path(&self, name: &str) -> PathBuf {
        let name = name.replace('\\', "/");
        match &self.base_dir {
            Some(dir) => dir.join(name),
            None => PathBuf::from(name),
        }
    }
}
