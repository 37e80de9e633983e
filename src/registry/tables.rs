//! The pharmacy table catalog.

use super::types::{FieldDescriptor, FieldType, PrimaryKey, SortDirection, SortSpec, TableSchema};
use super::TableRegistry;
use crate::error::RegistryError;

fn text(name: &str, label: &str) -> FieldDescriptor {
    FieldDescriptor::new(name, label, FieldType::String)
}

fn number(name: &str, label: &str) -> FieldDescriptor {
    FieldDescriptor::new(name, label, FieldType::Number)
}

fn decimal(name: &str, label: &str) -> FieldDescriptor {
    FieldDescriptor::new(name, label, FieldType::Decimal)
}

fn date(name: &str, label: &str) -> FieldDescriptor {
    FieldDescriptor::new(name, label, FieldType::Date)
}

fn sort_asc(field: &str) -> Option<SortSpec> {
    Some(SortSpec {
        field: field.to_string(),
        direction: SortDirection::Asc,
    })
}

fn sort_desc(field: &str) -> Option<SortSpec> {
    Some(SortSpec {
        field: field.to_string(),
        direction: SortDirection::Desc,
    })
}

fn table(
    table_id: &str,
    table_name: &str,
    label: &str,
    primary_key: PrimaryKey,
    fields: Vec<FieldDescriptor>,
    default_sort: Option<SortSpec>,
) -> TableSchema {
    TableSchema {
        table_id: table_id.to_string(),
        table_name: table_name.to_string(),
        label: label.to_string(),
        primary_key,
        fields,
        default_sort,
    }
}

fn single(field: &str) -> PrimaryKey {
    PrimaryKey::Single(field.to_string())
}

fn composite(fields: &[&str]) -> PrimaryKey {
    PrimaryKey::Composite(fields.iter().map(|f| f.to_string()).collect())
}

/// Build the full catalog. Identifiers are the URL path segments; physical
/// names match the Oracle-era schema this system was migrated from.
pub fn pharmacy_registry() -> Result<TableRegistry, RegistryError> {
    let tables = vec![
        table(
            "departamento",
            "DEPARTAMENTO",
            "Departamentos",
            single("ID_DEPARTAMENTO"),
            vec![
                number("ID_DEPARTAMENTO", "Id").auto(),
                text("NOMBRE", "Nombre").required(),
            ],
            sort_asc("NOMBRE"),
        ),
        table(
            "municipio",
            "MUNICIPIO",
            "Municipios",
            single("ID_MUNICIPIO"),
            vec![
                number("ID_MUNICIPIO", "Id").auto(),
                text("NOMBRE", "Nombre").required(),
                number("ID_DEPARTAMENTO", "Departamento").references("departamento", "NOMBRE"),
            ],
            sort_asc("NOMBRE"),
        ),
        table(
            "sucursal",
            "SUCURSAL",
            "Sucursales",
            single("ID_SUCURSAL"),
            vec![
                number("ID_SUCURSAL", "Id").auto(),
                text("NOMBRE", "Nombre").required(),
                text("DIRECCION", "Dirección"),
                text("TELEFONO", "Teléfono"),
                number("ID_MUNICIPIO", "Municipio").references("municipio", "NOMBRE"),
            ],
            sort_asc("NOMBRE"),
        ),
        table(
            "puesto",
            "PUESTO",
            "Puestos",
            single("ID_PUESTO"),
            vec![
                number("ID_PUESTO", "Id").auto(),
                text("NOMBRE", "Nombre").required(),
                decimal("SALARIO_BASE", "Salario base"),
            ],
            sort_asc("NOMBRE"),
        ),
        table(
            "empleado",
            "EMPLEADO",
            "Empleados",
            single("ID_EMPLEADO"),
            vec![
                number("ID_EMPLEADO", "Id").auto(),
                text("NOMBRE", "Nombre").required(),
                text("APELLIDO", "Apellido").required(),
                text("TELEFONO", "Teléfono"),
                date("FECHA_CONTRATACION", "Fecha de contratación"),
                number("ID_PUESTO", "Puesto").references("puesto", "NOMBRE"),
                number("ID_SUCURSAL", "Sucursal").references("sucursal", "NOMBRE"),
            ],
            sort_asc("APELLIDO"),
        ),
        table(
            "proveedor",
            "PROVEEDOR",
            "Proveedores",
            single("ID_PROVEEDOR"),
            vec![
                number("ID_PROVEEDOR", "Id").auto(),
                text("NOMBRE", "Nombre").required(),
                text("NIT", "NIT"),
                text("TELEFONO", "Teléfono"),
                text("DIRECCION", "Dirección"),
            ],
            sort_asc("NOMBRE"),
        ),
        table(
            "tipo_producto",
            "TIPO_PRODUCTO",
            "Tipos de producto",
            single("ID_TIPO_PRODUCTO"),
            vec![
                number("ID_TIPO_PRODUCTO", "Id").auto(),
                text("NOMBRE", "Nombre").required(),
            ],
            sort_asc("NOMBRE"),
        ),
        table(
            "producto",
            "PRODUCTO",
            "Productos",
            single("ID_PRODUCTO"),
            vec![
                number("ID_PRODUCTO", "Id").auto(),
                text("NOMBRE", "Nombre").required(),
                text("DESCRIPCION", "Descripción"),
                decimal("PRECIO", "Precio").required(),
                date("FECHA_VENCIMIENTO", "Fecha de vencimiento"),
                number("ID_TIPO_PRODUCTO", "Tipo").references("tipo_producto", "NOMBRE"),
                number("ID_PROVEEDOR", "Proveedor").references("proveedor", "NOMBRE"),
            ],
            sort_asc("NOMBRE"),
        ),
        table(
            "inventario_sucursal",
            "INVENTARIO_SUCURSAL",
            "Inventario por sucursal",
            composite(&["ID_SUCURSAL", "ID_PRODUCTO"]),
            vec![
                number("ID_SUCURSAL", "Sucursal")
                    .required()
                    .references("sucursal", "NOMBRE"),
                number("ID_PRODUCTO", "Producto")
                    .required()
                    .references("producto", "NOMBRE"),
                number("EXISTENCIA", "Existencia").required(),
                number("STOCK_MINIMO", "Stock mínimo"),
            ],
            None,
        ),
        table(
            "cliente",
            "CLIENTE",
            "Clientes",
            single("ID_CLIENTE"),
            vec![
                number("ID_CLIENTE", "Id").auto(),
                text("NOMBRE", "Nombre").required(),
                text("NIT", "NIT"),
                text("TELEFONO", "Teléfono"),
                text("DIRECCION", "Dirección"),
            ],
            sort_asc("NOMBRE"),
        ),
        table(
            "tipo_pedido",
            "TIPO_PEDIDO",
            "Tipos de pedido",
            single("ID_TIPO_PEDIDO"),
            vec![
                number("ID_TIPO_PEDIDO", "Id").auto(),
                text("NOMBRE", "Nombre").required(),
            ],
            sort_asc("NOMBRE"),
        ),
        table(
            "pedido",
            "PEDIDO",
            "Pedidos",
            single("ID_PEDIDO"),
            vec![
                number("ID_PEDIDO", "Id").auto(),
                date("FECHA_PEDIDO", "Fecha").required(),
                text("ESTADO", "Estado"),
                number("ID_PROVEEDOR", "Proveedor").references("proveedor", "NOMBRE"),
                number("ID_SUCURSAL", "Sucursal").references("sucursal", "NOMBRE"),
                number("ID_TIPO_PEDIDO", "Tipo").references("tipo_pedido", "NOMBRE"),
            ],
            sort_desc("FECHA_PEDIDO"),
        ),
        table(
            "detalle_pedido",
            "DETALLE_PEDIDO",
            "Detalle de pedido",
            composite(&["ID_PEDIDO", "ID_PRODUCTO"]),
            vec![
                number("ID_PEDIDO", "Pedido").required().references("pedido", "ESTADO"),
                number("ID_PRODUCTO", "Producto")
                    .required()
                    .references("producto", "NOMBRE"),
                number("CANTIDAD", "Cantidad").required(),
                decimal("PRECIO_UNITARIO", "Precio unitario"),
            ],
            None,
        ),
        table(
            "forma_pago",
            "FORMA_PAGO",
            "Formas de pago",
            single("ID_FORMA_PAGO"),
            vec![
                number("ID_FORMA_PAGO", "Id").auto(),
                text("NOMBRE", "Nombre").required(),
            ],
            sort_asc("NOMBRE"),
        ),
        table(
            "venta",
            "VENTA",
            "Ventas",
            single("ID_VENTA"),
            vec![
                number("ID_VENTA", "Id").auto(),
                date("FECHA_VENTA", "Fecha").required(),
                decimal("TOTAL", "Total"),
                number("ID_CLIENTE", "Cliente").references("cliente", "NOMBRE"),
                number("ID_EMPLEADO", "Empleado").references("empleado", "NOMBRE"),
                number("ID_FORMA_PAGO", "Forma de pago").references("forma_pago", "NOMBRE"),
            ],
            sort_desc("FECHA_VENTA"),
        ),
        table(
            "detalle_venta",
            "DETALLE_VENTA",
            "Detalle de venta",
            composite(&["ID_VENTA", "ID_PRODUCTO"]),
            vec![
                number("ID_VENTA", "Venta").required().references("venta", "FECHA_VENTA"),
                number("ID_PRODUCTO", "Producto")
                    .required()
                    .references("producto", "NOMBRE"),
                number("CANTIDAD", "Cantidad").required(),
                decimal("PRECIO_UNITARIO", "Precio unitario"),
                decimal("SUBTOTAL", "Subtotal"),
            ],
            None,
        ),
        table(
            "traslado",
            "TRASLADO",
            "Traslados",
            single("ID_TRASLADO"),
            vec![
                number("ID_TRASLADO", "Id").auto(),
                date("FECHA_TRASLADO", "Fecha").required(),
                number("ID_SUCURSAL_ORIGEN", "Origen").references("sucursal", "NOMBRE"),
                number("ID_SUCURSAL_DESTINO", "Destino").references("sucursal", "NOMBRE"),
            ],
            sort_desc("FECHA_TRASLADO"),
        ),
        table(
            "detalle_traslado",
            "DETALLE_TRASLADO",
            "Detalle de traslado",
            composite(&["ID_TRASLADO", "ID_PRODUCTO"]),
            vec![
                number("ID_TRASLADO", "Traslado")
                    .required()
                    .references("traslado", "FECHA_TRASLADO"),
                number("ID_PRODUCTO", "Producto")
                    .required()
                    .references("producto", "NOMBRE"),
                number("CANTIDAD", "Cantidad").required(),
            ],
            None,
        ),
        table(
            "flujo_caja",
            "FLUJO_CAJA",
            "Flujo de caja",
            single("ID_FLUJO"),
            vec![
                number("ID_FLUJO", "Id").auto(),
                date("FECHA", "Fecha").required(),
                text("TIPO", "Tipo").required(),
                decimal("MONTO", "Monto").required(),
                text("DESCRIPCION", "Descripción"),
                number("ID_SUCURSAL", "Sucursal").references("sucursal", "NOMBRE"),
            ],
            sort_desc("FECHA"),
        ),
        table(
            "tipo_activo",
            "TIPO_ACTIVO",
            "Tipos de activo",
            single("ID_TIPO_ACTIVO"),
            vec![
                number("ID_TIPO_ACTIVO", "Id").auto(),
                text("NOMBRE", "Nombre").required(),
            ],
            sort_asc("NOMBRE"),
        ),
        table(
            "activo_fijo",
            "ACTIVO_FIJO",
            "Activos fijos",
            single("ID_ACTIVO"),
            vec![
                number("ID_ACTIVO", "Id").auto(),
                text("NOMBRE", "Nombre").required(),
                date("FECHA_ADQUISICION", "Fecha de adquisición"),
                decimal("VALOR", "Valor"),
                number("ID_TIPO_ACTIVO", "Tipo").references("tipo_activo", "NOMBRE"),
                number("ID_SUCURSAL", "Sucursal").references("sucursal", "NOMBRE"),
            ],
            sort_asc("NOMBRE"),
        ),
    ];

    TableRegistry::new(tables)
}
